use color_eyre::eyre::{self, bail};

use super::VerifyArgs;
use crate::context::Context;

pub fn run(VerifyArgs { proof, commitment }: VerifyArgs, context: Context) -> eyre::Result<()> {
    let Some((min, max)) = proof.proof.verify_range(
        context.zkp(),
        &commitment.commitment,
        &commitment.generator(),
        &commitment.extra_commit()?,
    ) else {
        bail!("Range proof is invalid")
    };

    println!("Range proof is valid, value is in [{}, {}]", min, max);

    Ok(())
}

use clap::Args;
use color_eyre::eyre;

use super::{CommitmentArgs, ProofArgs};
use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct RewindArgs {
    #[command(flatten)]
    pub proof: ProofArgs,

    #[command(flatten)]
    pub commitment: CommitmentArgs,

    /// Hex encoded nonce the proof was signed with.
    #[clap(long, value_parser = parse_hex32)]
    pub nonce: [u8; 32],
}

pub fn run(
    RewindArgs {
        proof,
        commitment,
        nonce,
    }: RewindArgs,
    context: Context,
) -> eyre::Result<()> {
    let rewound = proof.proof.rewind(
        context.zkp(),
        &commitment.commitment,
        &nonce,
        &commitment.generator(),
        &commitment.extra_commit()?,
    )?;

    let message_len = rewound
        .message
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |last| last + 1);

    println!("Value: {}", rewound.value);
    println!("Blinding factor: {}", hex::encode(rewound.blinding_factor));
    println!("Range: [{}, {}]", rewound.min_value, rewound.max_value);
    println!(
        "Message: {}",
        String::from_utf8_lossy(&rewound.message[..message_len])
    );

    Ok(())
}

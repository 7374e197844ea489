use clap::Args;
use color_eyre::eyre;
use confidential_zkp::{Commitment, Generator, GENERATOR_H};

use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Value to commit to.
    #[clap(long)]
    pub value: u64,

    /// Hex encoded blinding factor.
    #[clap(long, value_parser = parse_hex32)]
    pub blind: [u8; 32],

    /// Hex encoded generator, the standard value generator `H` if omitted.
    #[clap(long)]
    pub generator: Option<Generator>,
}

pub fn run(
    CommitArgs {
        value,
        blind,
        generator,
    }: CommitArgs,
    context: Context,
) -> eyre::Result<()> {
    let generator = generator.unwrap_or(*GENERATOR_H);

    let commitment = Commitment::new(context.zkp(), &blind, value, &generator)?;

    println!("Commitment: {}", commitment);

    Ok(())
}

use clap::{Args, Subcommand};
use color_eyre::eyre;
use confidential_zkp::{Commitment, Generator, RangeProof, GENERATOR_H};

use self::{rewind::RewindArgs, sign::SignArgs};
use crate::context::Context;

mod info;
mod rewind;
mod sign;
mod verify;

#[derive(Subcommand, Debug)]
pub enum RangeProofCommands {
    /// Commit to a value and prove its range.
    Sign(SignArgs),

    /// Decode the public parameters of a proof.
    Info(ProofArgs),

    /// Verify a proof against a commitment.
    Verify(VerifyArgs),

    /// Recover the value, blinding factor and message of a proof.
    Rewind(RewindArgs),
}

#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Hex encoded range proof.
    #[clap(long)]
    pub proof: RangeProof,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub proof: ProofArgs,

    #[command(flatten)]
    pub commitment: CommitmentArgs,
}

/// What a proof is checked against.
#[derive(Args, Debug)]
pub struct CommitmentArgs {
    /// Hex encoded commitment.
    #[clap(long)]
    pub commitment: Commitment,

    /// Hex encoded generator, the standard value generator `H` if omitted.
    #[clap(long)]
    pub generator: Option<Generator>,

    /// Hex encoded data the proof commits to.
    #[clap(long)]
    pub extra_commit: Option<String>,
}

impl CommitmentArgs {
    fn generator(&self) -> Generator {
        self.generator.unwrap_or(*GENERATOR_H)
    }

    fn extra_commit(&self) -> eyre::Result<Vec<u8>> {
        decode_optional_hex(self.extra_commit.as_deref())
    }
}

fn decode_optional_hex(encoded: Option<&str>) -> eyre::Result<Vec<u8>> {
    Ok(encoded.map(hex::decode).transpose()?.unwrap_or_default())
}

pub fn run(cmd: RangeProofCommands, context: Context) -> eyre::Result<()> {
    match cmd {
        RangeProofCommands::Sign(args) => sign::run(args, context),
        RangeProofCommands::Info(args) => info::run(args),
        RangeProofCommands::Verify(args) => verify::run(args, context),
        RangeProofCommands::Rewind(args) => rewind::run(args, context),
    }
}

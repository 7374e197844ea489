use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity::Verbosity;
use color_eyre::eyre;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

use self::{
    blind_sum::BlindSumArgs, commit::CommitArgs, ecdh::EcdhArgs, generator::GeneratorArgs,
    keys::KeysCommands, rangeproof::RangeProofCommands, surjection::SurjectionCommands,
};
use crate::{config::Config, context::Context};

mod blind_sum;
mod commit;
mod ecdh;
mod generator;
mod keys;
mod rangeproof;
mod surjection;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity,

    #[command(subcommand)]
    pub command: Commands,

    #[clap(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, tweak and combine keys.
    #[command(subcommand)]
    Keys(KeysCommands),

    /// Derive a shared secret from a public and a secret key.
    Ecdh(EcdhArgs),

    /// Derive an asset generator from a seed.
    Generator(GeneratorArgs),

    /// Commit to a value.
    Commit(CommitArgs),

    /// Sum blinding factors.
    BlindSum(BlindSumArgs),

    /// Sign, verify, decode and rewind range proofs.
    #[command(subcommand)]
    Rangeproof(RangeProofCommands),

    /// Prove and verify asset surjection.
    #[command(subcommand)]
    Surjection(SurjectionCommands),
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        let config = Config::from_path(&self.config)?;

        let level = self
            .verbosity
            .log_level_filter()
            .as_trace()
            .max(LevelFilter::from_level(config.logger.level));

        tracing_subscriber::fmt().with_max_level(level).init();

        let context = Context::new(config);
        execute_command(self.command, context)
    }
}

fn execute_command(command: Commands, context: Context) -> eyre::Result<()> {
    use Commands as Cmd;
    match command {
        Cmd::Keys(cmd) => keys::run(cmd, context),
        Cmd::Ecdh(args) => ecdh::run(args, context),
        Cmd::Generator(args) => generator::run(args, context),
        Cmd::Commit(args) => commit::run(args, context),
        Cmd::BlindSum(args) => blind_sum::run(args),
        Cmd::Rangeproof(cmd) => rangeproof::run(cmd, context),
        Cmd::Surjection(cmd) => surjection::run(cmd, context),
    }
}

/// Parses 32 hex encoded bytes, e.g. a secret key, blind, nonce or seed.
pub fn parse_hex32(s: &str) -> eyre::Result<[u8; 32]> {
    let bytes = hex::decode(s)?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| eyre::eyre!("Expected 32 bytes, got {}", bytes.len()))
}

/// Checks if all the arguments to the command are specified the same number of times.
#[macro_export]
macro_rules! check_equal_lengths {
    ($($args:expr),+ $(,)?) => {
        {
            let lengths = [$($args.len()),+];
            eyre::ensure!(lengths.iter().all(|&len| len == lengths[0]), "The number of the repeated arguments must match")
        }
    };
}

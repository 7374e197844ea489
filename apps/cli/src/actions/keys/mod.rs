use clap::Subcommand;
use color_eyre::eyre;

use self::{combine::CombineArgs, create::CreateArgs, tweak::TweakArgs};
use crate::context::Context;

mod combine;
mod create;
mod tweak;

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Create a key pair, from a random or a given secret key.
    Create(CreateArgs),

    /// Add or multiply a tweak to a secret or a public key.
    Tweak(TweakArgs),

    /// Sum public keys.
    Combine(CombineArgs),
}

pub fn run(cmd: KeysCommands, context: Context) -> eyre::Result<()> {
    match cmd {
        KeysCommands::Create(args) => create::run(args, context),
        KeysCommands::Tweak(args) => tweak::run(args, context),
        KeysCommands::Combine(args) => combine::run(args),
    }
}

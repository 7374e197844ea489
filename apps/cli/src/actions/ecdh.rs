use clap::Args;
use color_eyre::eyre;
use confidential_zkp::{ecdh, PublicKey};

use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct EcdhArgs {
    /// Hex encoded public key of the other party.
    #[clap(long)]
    pub public: PublicKey,

    /// Hex encoded own secret key.
    #[clap(long, value_parser = parse_hex32)]
    pub secret: [u8; 32],
}

pub fn run(EcdhArgs { public, secret }: EcdhArgs, context: Context) -> eyre::Result<()> {
    let shared = ecdh(context.zkp(), &public, &secret)?;

    println!("Shared secret: {}", hex::encode(shared));

    Ok(())
}

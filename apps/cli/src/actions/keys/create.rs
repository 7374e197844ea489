use bitcoin::secp256k1::{rand::thread_rng, SecretKey};
use clap::Args;
use color_eyre::eyre;
use confidential_zkp::PrivateKey;

use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Hex encoded secret key, a random one is generated if omitted.
    #[clap(long, value_parser = parse_hex32)]
    pub secret: Option<[u8; 32]>,
}

pub fn run(CreateArgs { secret }: CreateArgs, context: Context) -> eyre::Result<()> {
    let secret = match secret {
        Some(secret) => PrivateKey::from_slice(&secret)?,
        None => PrivateKey::from(SecretKey::new(&mut thread_rng())),
    };

    let public = secret.public_key(context.zkp())?;

    println!("Secret key: {}", hex::encode(secret.secret_bytes()));
    println!("Public key: {}", public);
    println!(
        "Uncompressed public key: {}",
        hex::encode(public.serialize_uncompressed())
    );

    Ok(())
}

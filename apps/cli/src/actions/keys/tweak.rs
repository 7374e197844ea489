use clap::{ArgGroup, Args};
use color_eyre::eyre;
use confidential_zkp::{PrivateKey, PublicKey};

use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
#[clap(group(
    ArgGroup::new("key")
        .required(true)
        .args(&["secret", "public"])
        .multiple(false),
))]
pub struct TweakArgs {
    /// Hex encoded secret key to tweak.
    #[clap(long, value_parser = parse_hex32)]
    pub secret: Option<[u8; 32]>,

    /// Hex encoded public key to tweak.
    #[clap(long)]
    pub public: Option<PublicKey>,

    /// Hex encoded 32 byte tweak.
    #[clap(long, value_parser = parse_hex32)]
    pub tweak: [u8; 32],

    /// Multiply by the tweak instead of adding it.
    #[clap(long)]
    pub mul: bool,
}

pub fn run(
    TweakArgs {
        secret,
        public,
        tweak,
        mul,
    }: TweakArgs,
    context: Context,
) -> eyre::Result<()> {
    if let Some(secret) = secret {
        let secret = PrivateKey::from_slice(&secret)?;

        let tweaked = if mul {
            secret.tweak_mul(&tweak)?
        } else {
            secret.tweak_add(&tweak)?
        };

        println!("Secret key: {}", hex::encode(tweaked.secret_bytes()));
        println!("Public key: {}", tweaked.public_key(context.zkp())?);
    }

    if let Some(public) = public {
        let tweaked = if mul {
            public.tweak_mul(context.zkp(), &tweak)?
        } else {
            public.tweak_add(context.zkp(), &tweak)?
        };

        println!("Public key: {}", tweaked);
    }

    Ok(())
}

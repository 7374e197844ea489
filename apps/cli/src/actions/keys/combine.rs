use clap::Args;
use color_eyre::eyre;
use confidential_zkp::PublicKey;

#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Hex encoded public keys to sum, repeat the flag for every key.
    #[clap(long = "public", required = true)]
    pub keys: Vec<PublicKey>,
}

pub fn run(CombineArgs { keys }: CombineArgs) -> eyre::Result<()> {
    let combined = PublicKey::combine(&keys)?;

    println!("Public key: {}", combined);

    Ok(())
}

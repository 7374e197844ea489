use clap::Args;
use color_eyre::eyre;
use confidential_zkp::blind_sum;

use crate::actions::parse_hex32;

#[derive(Args, Debug)]
pub struct BlindSumArgs {
    /// Hex encoded blinding factors added to the sum.
    #[clap(long = "positive", value_parser = parse_hex32)]
    pub positive: Vec<[u8; 32]>,

    /// Hex encoded blinding factors subtracted from the sum.
    #[clap(long = "negative", value_parser = parse_hex32)]
    pub negative: Vec<[u8; 32]>,
}

pub fn run(BlindSumArgs { positive, negative }: BlindSumArgs) -> eyre::Result<()> {
    let sum = blind_sum(&positive, &negative)?;

    println!("Blinding factor: {}", hex::encode(sum));

    Ok(())
}

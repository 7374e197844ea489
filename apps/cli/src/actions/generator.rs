use clap::Args;
use color_eyre::eyre;
use confidential_zkp::FixedAssetTag;

use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct GeneratorArgs {
    /// Hex encoded asset tag the generator is derived from.
    #[clap(long)]
    pub asset: FixedAssetTag,

    /// Hex encoded blinding factor, the generator is unblinded if omitted.
    #[clap(long, value_parser = parse_hex32)]
    pub blind: Option<[u8; 32]>,
}

pub fn run(GeneratorArgs { asset, blind }: GeneratorArgs, context: Context) -> eyre::Result<()> {
    let generator = match blind {
        Some(blind) => asset.blinded_generator(context.zkp(), &blind)?,
        None => asset.generator(context.zkp())?,
    };

    println!("Generator: {}", generator);

    Ok(())
}

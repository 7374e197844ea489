use bitcoin::secp256k1::rand::{thread_rng, Rng};
use clap::Args;
use color_eyre::eyre;
use confidential_zkp::{Commitment, Generator, RangeProof, SignParams, GENERATOR_H};

use super::decode_optional_hex;
use crate::{actions::parse_hex32, context::Context};

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Value to commit to.
    #[clap(long)]
    pub value: u64,

    /// Hex encoded blinding factor of the commitment.
    #[clap(long, value_parser = parse_hex32)]
    pub blind: [u8; 32],

    /// Hex encoded nonce needed to rewind the proof, a random one is
    /// generated if omitted.
    #[clap(long, value_parser = parse_hex32)]
    pub nonce: Option<[u8; 32]>,

    /// Hex encoded generator, the standard value generator `H` if omitted.
    #[clap(long)]
    pub generator: Option<Generator>,

    /// Publicly revealed minimum value, `[rangeproof] min_value` if omitted.
    #[clap(long)]
    pub min_value: Option<u64>,

    /// Base 10 exponent, -1 reveals the value. `[rangeproof] exp` if omitted.
    #[clap(long, allow_hyphen_values = true)]
    pub exp: Option<i32>,

    /// Minimal number of proven bits, `[rangeproof] min_bits` if omitted.
    #[clap(long)]
    pub min_bits: Option<u32>,

    /// Message hidden in the proof.
    #[clap(long)]
    pub message: Option<String>,

    /// Hex encoded data the proof commits to.
    #[clap(long)]
    pub extra_commit: Option<String>,
}

pub fn run(args: SignArgs, context: Context) -> eyre::Result<()> {
    let ctx = context.zkp();
    let generator = args.generator.unwrap_or(*GENERATOR_H);
    let nonce = args.nonce.unwrap_or_else(|| thread_rng().gen());
    let extra_commit = decode_optional_hex(args.extra_commit.as_deref())?;

    let defaults = SignParams::from(&context.config().prover.rangeproof);
    let params = SignParams {
        min_value: args.min_value.unwrap_or(defaults.min_value),
        exp: args.exp.unwrap_or(defaults.exp),
        min_bits: args.min_bits.unwrap_or(defaults.min_bits),
        message: args.message.as_deref().map(str::as_bytes).unwrap_or_default(),
        extra_commit: &extra_commit,
    };

    let commitment = Commitment::new(ctx, &args.blind, args.value, &generator)?;
    let proof = RangeProof::sign(
        ctx,
        &commitment,
        &args.blind,
        &nonce,
        args.value,
        &generator,
        &params,
    )?;

    let info = proof.info()?;

    println!("Commitment: {}", commitment);
    println!("Nonce: {}", hex::encode(nonce));
    println!("Range: [{}, {}]", info.min_value, info.max_value);
    println!("Proof ({} bytes): {}", proof.len(), proof);

    Ok(())
}

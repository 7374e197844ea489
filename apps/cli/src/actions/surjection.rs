use bitcoin::secp256k1::rand::{thread_rng, Rng};
use clap::{Args, Subcommand};
use color_eyre::eyre::{self, bail, OptionExt};
use confidential_zkp::{FixedAssetTag, Generator, InitializedProof, SurjectionProof};

use crate::{actions::parse_hex32, check_equal_lengths, context::Context};

#[derive(Subcommand, Debug)]
pub enum SurjectionCommands {
    /// Prove that the output asset is one of the input assets.
    Prove(ProveArgs),

    /// Verify a proof against blinded input and output generators.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Hex encoded asset tag of an input, repeat for every input.
    #[clap(long = "input-asset", required = true)]
    pub input_assets: Vec<FixedAssetTag>,

    /// Hex encoded generator blind of an input, one per input asset.
    #[clap(long = "input-blind", value_parser = parse_hex32, required = true)]
    pub input_blinds: Vec<[u8; 32]>,

    /// Hex encoded asset tag of the output.
    #[clap(long)]
    pub output_asset: FixedAssetTag,

    /// Hex encoded generator blind of the output.
    #[clap(long, value_parser = parse_hex32)]
    pub output_blind: [u8; 32],

    /// Hex encoded seed of the input selection, a random one if omitted.
    #[clap(long, value_parser = parse_hex32)]
    pub seed: Option<[u8; 32]>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hex encoded surjection proof.
    #[clap(long)]
    pub proof: SurjectionProof,

    /// Hex encoded blinded generator of an input, repeat for every input.
    #[clap(long = "input", required = true)]
    pub inputs: Vec<Generator>,

    /// Hex encoded blinded generator of the output.
    #[clap(long)]
    pub output: Generator,
}

pub fn run(cmd: SurjectionCommands, context: Context) -> eyre::Result<()> {
    match cmd {
        SurjectionCommands::Prove(args) => prove(args, context),
        SurjectionCommands::Verify(args) => verify(args, context),
    }
}

fn prove(args: ProveArgs, context: Context) -> eyre::Result<()> {
    check_equal_lengths!(args.input_assets, args.input_blinds);

    let ctx = context.zkp();
    let seed = args.seed.unwrap_or_else(|| thread_rng().gen());

    let InitializedProof {
        mut proof,
        input_index,
        iterations,
    } = SurjectionProof::initialize_with_config(
        ctx,
        &args.input_assets,
        &args.output_asset,
        &context.config().prover.surjection,
        &seed,
    )?
    .ok_or_eyre("No input subset contains the output asset, try another seed")?;

    tracing::debug!(iterations, input_index, "Initialized surjection proof");

    let inputs = args
        .input_assets
        .iter()
        .zip(&args.input_blinds)
        .map(|(asset, blind)| asset.blinded_generator(ctx, blind))
        .collect::<Result<Vec<_>, _>>()?;
    let output = args
        .output_asset
        .blinded_generator(ctx, &args.output_blind)?;

    proof.generate(
        ctx,
        &inputs,
        &output,
        input_index,
        &args.input_blinds[input_index],
        &args.output_blind,
    )?;

    for (i, input) in inputs.iter().enumerate() {
        println!("Input {i} generator: {input}");
    }
    println!("Output generator: {}", output);
    println!("Proof: {}", proof);

    Ok(())
}

fn verify(
    VerifyArgs {
        proof,
        inputs,
        output,
    }: VerifyArgs,
    context: Context,
) -> eyre::Result<()> {
    if !proof.verify(context.zkp(), &inputs, &output) {
        bail!("Surjection proof is invalid");
    }

    println!(
        "Surjection proof is valid, {} of {} inputs used",
        proof.n_used_inputs(),
        proof.n_total_inputs()
    );

    Ok(())
}

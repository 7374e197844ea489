use color_eyre::eyre;

use super::ProofArgs;

pub fn run(ProofArgs { proof }: ProofArgs) -> eyre::Result<()> {
    let info = proof.info()?;

    println!("Exponent: {}", info.exp);
    println!("Mantissa: {}", info.mantissa);
    println!("Min value: {}", info.min_value);
    println!("Max value: {}", info.max_value);

    Ok(())
}

//! Builds a confidential transaction spending two assets end to end: blinded
//! asset generators, balancing amount commitments, range proofs on every
//! output and surjection proofs tying output assets to the inputs.

use confidential_zkp::{
    blind_generator_blind_sum, ecdh, verify_tally, Commitment, Context, ContextFlags,
    FixedAssetTag, InitializedProof, PrivateKey, RangeProof, SignParams, SurjectionProof,
};
use once_cell::sync::Lazy;

mod common;
use common::*;

static CTX: Lazy<Context> = Lazy::new(|| Context::new(ContextFlags::BOTH));

static BITCOIN: Lazy<FixedAssetTag> = Lazy::new(|| {
    "6f0279e9ed041c3d710a9f57d0c02928416460c4b722ae3457a11eec381c526d"
        .parse()
        .expect("Should be valid asset tag")
});

static USD: Lazy<FixedAssetTag> = Lazy::new(|| {
    "ce091c998b83c78bb71a632313ba3760f1763d9cfcffae02258ffa9865a37bd2"
        .parse()
        .expect("Should be valid asset tag")
});

const SENDER_SECRET: [u8; 32] = [0x21; 32];
const RECIPIENT_SECRET: [u8; 32] = [0x42; 32];

/// Inputs and outputs of the transaction, where the last output's value
/// blind is solved so that everything balances.
fn transaction() -> eyre::Result<(Vec<Output>, Vec<Output>)> {
    let inputs = vec![Output::new(*BITCOIN, 150_000), Output::new(*USD, 2_500)];
    let mut outputs = vec![
        Output::new(*USD, 2_000),
        Output::new(*BITCOIN, 100_000),
        Output::new(*USD, 500),
        Output::new(*BITCOIN, 50_000),
    ];

    let entries = inputs.iter().chain(&outputs);
    let values: Vec<u64> = entries.clone().map(|o| o.value).collect();
    let generator_blinds: Vec<[u8; 32]> = entries.clone().map(|o| o.asset_blind).collect();
    let value_blinds: Vec<[u8; 32]> = entries.map(|o| o.value_blind).collect();

    let last_blind = blind_generator_blind_sum(
        &values,
        &generator_blinds,
        &value_blinds[..value_blinds.len() - 1],
        inputs.len(),
    )?;

    if let Some(last) = outputs.last_mut() {
        last.value_blind = last_blind;
    }

    Ok((inputs, outputs))
}

#[test]
fn test_commitments_balance() -> eyre::Result<()> {
    let (inputs, outputs) = transaction()?;

    let input_commitments = inputs
        .iter()
        .map(|o| o.commitment(&CTX))
        .collect::<eyre::Result<Vec<_>>>()?;
    let output_commitments = outputs
        .iter()
        .map(|o| o.commitment(&CTX))
        .collect::<eyre::Result<Vec<_>>>()?;

    assert!(verify_tally(&output_commitments, &input_commitments));

    // Moving a single unit breaks the balance.
    let mut inflated = output_commitments.clone();
    inflated[1] = Commitment::new(
        &CTX,
        &outputs[1].value_blind,
        outputs[1].value + 1,
        &outputs[1].generator(&CTX)?,
    )?;
    assert!(!verify_tally(&inflated, &input_commitments));

    Ok(())
}

#[test]
fn test_range_proofs_rewind_for_the_recipient() -> eyre::Result<()> {
    let (_, outputs) = transaction()?;

    // The nonce of every proof is shared between sender and recipient.
    let sender = PrivateKey::from_slice(&SENDER_SECRET)?.public_key(&CTX)?;
    let recipient = PrivateKey::from_slice(&RECIPIENT_SECRET)?.public_key(&CTX)?;
    let nonce = ecdh(&CTX, &recipient, &SENDER_SECRET)?;
    assert_eq!(nonce, ecdh(&CTX, &sender, &RECIPIENT_SECRET)?);

    for output in &outputs {
        let generator = output.generator(&CTX)?;
        let commitment = output.commitment(&CTX)?;
        let message = [&output.asset.as_bytes()[..], &output.asset_blind[..]].concat();

        let proof = RangeProof::sign(
            &CTX,
            &commitment,
            &output.value_blind,
            &nonce,
            output.value,
            &generator,
            &SignParams {
                min_bits: 36,
                message: &message,
                extra_commit: &commitment.serialize(),
                ..Default::default()
            },
        )?;

        let verifier = Context::shared(ContextFlags::VERIFY);
        assert!(proof.verify(verifier, &commitment, &generator, &commitment.serialize()));

        let rewound = proof.rewind(
            &CTX,
            &commitment,
            &nonce,
            &generator,
            &commitment.serialize(),
        )?;
        assert_eq!(rewound.value, output.value);
        assert_eq!(rewound.blinding_factor, output.value_blind);
        assert_eq!(&rewound.message[..64], &message[..]);

        let range = proof.info()?;
        assert_eq!(range.min_value, 0);
        assert_eq!(range.max_value, (1u64 << 36) - 1);
    }

    Ok(())
}

#[test]
fn test_surjection_proofs_for_every_output() -> eyre::Result<()> {
    let (inputs, outputs) = transaction()?;

    let input_tags: Vec<FixedAssetTag> = inputs.iter().map(|o| o.asset).collect();
    let input_generators = inputs
        .iter()
        .map(|o| o.generator(&CTX))
        .collect::<eyre::Result<Vec<_>>>()?;

    for (i, output) in outputs.iter().enumerate() {
        let output_generator = output.generator(&CTX)?;

        let InitializedProof {
            mut proof,
            input_index,
            ..
        } = SurjectionProof::initialize(&CTX, &input_tags, 2, &output.asset, 100, &[i as u8; 32])?
            .ok_or_else(|| eyre::eyre!("Both inputs are used, selection can't fail"))?;

        assert_eq!(input_tags[input_index], output.asset);

        proof.generate(
            &CTX,
            &input_generators,
            &output_generator,
            input_index,
            &inputs[input_index].asset_blind,
            &output.asset_blind,
        )?;

        let serialized = proof.serialize();
        assert_eq!(serialized.len(), SurjectionProof::serialization_bytes(2, 2));

        let parsed = SurjectionProof::parse(&serialized)?;
        let verifier = Context::shared(ContextFlags::NONE);
        assert!(parsed.verify(verifier, &input_generators, &output_generator));
    }

    Ok(())
}

#[test]
fn test_unknown_asset_can_not_be_surjected() -> eyre::Result<()> {
    let (inputs, _) = transaction()?;
    let input_tags: Vec<FixedAssetTag> = inputs.iter().map(|o| o.asset).collect();

    let unknown = FixedAssetTag::new([0xee; 32]);
    let result = SurjectionProof::initialize(&CTX, &input_tags, 2, &unknown, 50, &[7; 32])?;

    assert!(result.is_none());

    Ok(())
}

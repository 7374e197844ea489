#[macro_use]
extern crate criterion;

use criterion::{black_box, BatchSize, Criterion};
use once_cell::sync::Lazy;
use rand::Rng;

use confidential_zkp::{
    Commitment, Context, ContextFlags, FixedAssetTag, Generator, InitializedProof, RangeProof,
    SignParams, SurjectionProof, GENERATOR_H,
};

static CTX: Lazy<Context> = Lazy::new(|| Context::new(ContextFlags::BOTH));

/// Number of inputs the surjection proofs pick from.
const N_INPUTS: usize = 10;
/// Number of inputs a surjection proof ring is built from.
const N_USED_INPUTS: usize = 3;

fn random_scalar() -> [u8; 32] {
    let mut bytes: [u8; 32] = rand::thread_rng().gen();
    bytes[0] &= 0x7f;
    bytes
}

struct Opening {
    value: u64,
    blind: [u8; 32],
    nonce: [u8; 32],
    commitment: Commitment,
}

fn new_opening() -> Opening {
    let value = rand::thread_rng().gen_range(0..1u64 << 52);
    let blind = random_scalar();
    let commitment =
        Commitment::new(&CTX, &blind, value, &GENERATOR_H).expect("blind should be in range");

    Opening {
        value,
        blind,
        nonce: random_scalar(),
        commitment,
    }
}

fn sign(opening: &Opening, min_bits: u32) -> RangeProof {
    RangeProof::sign(
        &CTX,
        &opening.commitment,
        &opening.blind,
        &opening.nonce,
        opening.value,
        &GENERATOR_H,
        &SignParams {
            min_bits,
            ..Default::default()
        },
    )
    .expect("range proof should be signed")
}

fn rangeproof_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rangeproof");

    for min_bits in [32, 52, 64] {
        group.bench_function(format!("sign {min_bits} bits"), |b| {
            b.iter_batched(
                new_opening,
                |opening| black_box(sign(&opening, min_bits)),
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("verify {min_bits} bits"), |b| {
            b.iter_batched(
                || {
                    let opening = new_opening();
                    let proof = sign(&opening, min_bits);
                    (opening, proof)
                },
                |(opening, proof)| {
                    black_box(proof.verify(&CTX, &opening.commitment, &GENERATOR_H, &[]))
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rewind {min_bits} bits"), |b| {
            b.iter_batched(
                || {
                    let opening = new_opening();
                    let proof = sign(&opening, min_bits);
                    (opening, proof)
                },
                |(opening, proof)| {
                    black_box(proof.rewind(
                        &CTX,
                        &opening.commitment,
                        &opening.nonce,
                        &GENERATOR_H,
                        &[],
                    ))
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

struct Surjection {
    proof: SurjectionProof,
    input_index: usize,
    inputs: Vec<Generator>,
    input_blinds: Vec<[u8; 32]>,
    output: Generator,
    output_blind: [u8; 32],
}

fn new_surjection() -> Surjection {
    let tags: Vec<FixedAssetTag> = (0..N_INPUTS)
        .map(|_| FixedAssetTag::new(rand::thread_rng().gen()))
        .collect();
    let input_blinds: Vec<[u8; 32]> = (0..N_INPUTS).map(|_| random_scalar()).collect();
    let inputs = tags
        .iter()
        .zip(&input_blinds)
        .map(|(tag, blind)| tag.blinded_generator(&CTX, blind))
        .collect::<Result<Vec<_>, _>>()
        .expect("blinds should be in range");

    let output_tag = tags[rand::thread_rng().gen_range(0..N_INPUTS)];
    let output_blind = random_scalar();
    let output = output_tag
        .blinded_generator(&CTX, &output_blind)
        .expect("blind should be in range");

    let InitializedProof {
        proof, input_index, ..
    } = SurjectionProof::initialize(
        &CTX,
        &tags,
        N_USED_INPUTS,
        &output_tag,
        100,
        &rand::thread_rng().gen(),
    )
    .expect("input counts should be valid")
    .expect("selection should succeed");

    Surjection {
        proof,
        input_index,
        inputs,
        input_blinds,
        output,
        output_blind,
    }
}

fn generate(mut s: Surjection) -> Surjection {
    s.proof
        .generate(
            &CTX,
            &s.inputs,
            &s.output,
            s.input_index,
            &s.input_blinds[s.input_index],
            &s.output_blind,
        )
        .expect("surjection proof should be generated");
    s
}

fn surjection_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("surjection");

    group.bench_function("generate", |b| {
        b.iter_batched(new_surjection, |s| black_box(generate(s)), BatchSize::SmallInput)
    });

    group.bench_function("verify", |b| {
        b.iter_batched(
            || generate(new_surjection()),
            |s| black_box(s.proof.verify(&CTX, &s.inputs, &s.output)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, rangeproof_benchmark, surjection_benchmark);
criterion_main!(benches);

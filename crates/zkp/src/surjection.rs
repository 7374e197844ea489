//! Surjection proofs: an ephemeral output asset generator is one of a set of
//! ephemeral input generators, blinded differently, without telling which.
//!
//! The prover picks a subset of the inputs containing one with the output's
//! asset and signs a single Borromean ring over the differences
//! `output - input`. Only the difference to the matching input has a known
//! discrete logarithm: the difference of the two generator blinds.

use core::fmt;
use core::str::FromStr;

use k256::{ProjectivePoint, Scalar};

use crate::asset::FixedAssetTag;
use crate::borromean;
use crate::config::SurjectionConfig;
use crate::context::{Context, ContextFlags};
use crate::errors::{Error, Result};
use crate::generator::Generator;
use crate::util::{compressed, scalar_from_bytes, scalar_to_bytes, sha256};

/// Maximum number of inputs a proof can refer to.
pub const MAX_INPUTS: usize = 256;
/// Maximum number of inputs a proof ring can contain.
pub const MAX_USED_INPUTS: usize = 256;

const BITMAP_SIZE: usize = MAX_INPUTS / 8;

/// Size of a proof over `n_inputs` inputs of which `n_used_inputs` are used.
pub const fn serialization_bytes(n_inputs: usize, n_used_inputs: usize) -> usize {
    2 + (n_inputs + 7) / 8 + 32 * (1 + n_used_inputs)
}

/// Deterministic index sampler seeded by the prover.
struct Csprng {
    state: [u8; 32],
    used: usize,
}

impl Csprng {
    fn new(seed: &[u8; 32]) -> Self {
        Self {
            state: *seed,
            used: 0,
        }
    }

    /// Uniform index below `rand_max`.
    fn next(&mut self, rand_max: usize) -> usize {
        let (increment, max_value) = if rand_max > 256 {
            (2, 0x10000)
        } else {
            (1, 0x100)
        };

        loop {
            if self.used + increment >= 32 {
                self.state = sha256(&[&self.state[..]]);
                self.used = 0;
            }

            let value = self.state[self.used..self.used + increment]
                .iter()
                .fold(0usize, |acc, byte| (acc << 8) + *byte as usize);
            self.used += increment;

            // Reject the top values that would bias the modulo.
            if value < max_value - max_value % rand_max {
                return value % rand_max;
            }
        }
    }
}

impl Drop for Csprng {
    fn drop(&mut self) {
        self.state = [0u8; 32];
    }
}

/// A proof after [`SurjectionProof::initialize`] picked its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedProof {
    pub proof: SurjectionProof,
    /// Index of the input whose asset matches the output.
    pub input_index: usize,
    /// Number of input subsets sampled, at least one.
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurjectionProof {
    n_inputs: usize,
    /// Bit `i` is set when input `i` is part of the ring.
    used_inputs: [u8; BITMAP_SIZE],
    /// `e0` followed by one value per used input.
    data: Vec<u8>,
}

impl SurjectionProof {
    /// See [`serialization_bytes`].
    pub const fn serialization_bytes(n_inputs: usize, n_used_inputs: usize) -> usize {
        serialization_bytes(n_inputs, n_used_inputs)
    }

    /// Picks `n_input_tags_to_use` of the `fixed_input_tags` so that one of
    /// them is `fixed_output_tag`, sampling subsets from `seed` at most
    /// `max_iterations` times.
    ///
    /// Returns `Ok(None)` when no sampled subset contained the output's
    /// asset. The odds of that shrink with every extra iteration allowed.
    pub fn initialize(
        _ctx: &Context,
        fixed_input_tags: &[FixedAssetTag],
        n_input_tags_to_use: usize,
        fixed_output_tag: &FixedAssetTag,
        max_iterations: usize,
        seed: &[u8; 32],
    ) -> Result<Option<InitializedProof>> {
        let n_inputs = fixed_input_tags.len();

        if n_inputs == 0 || n_inputs > MAX_INPUTS {
            return Err(Error::InvalidInputCount("inputs must number from 1 to 256"));
        }
        if n_input_tags_to_use == 0 || n_input_tags_to_use > n_inputs.min(MAX_USED_INPUTS) {
            return Err(Error::InvalidInputCount(
                "inputs to use must number from 1 to the number of inputs",
            ));
        }

        let mut rng = Csprng::new(seed);
        let mut iterations = 0;

        loop {
            let mut input_index = None;
            let mut used_inputs = [0u8; BITMAP_SIZE];

            for _ in 0..n_input_tags_to_use {
                loop {
                    let next = rng.next(n_inputs);

                    if fixed_input_tags[next] == *fixed_output_tag {
                        input_index = Some(next);
                    }

                    let (byte, bit) = (next / 8, 1 << (next % 8));
                    if used_inputs[byte] & bit == 0 {
                        used_inputs[byte] |= bit;
                        break;
                    }
                }
            }

            iterations += 1;

            if let Some(input_index) = input_index {
                tracing::trace!(iterations, input_index, "Selected surjection proof inputs");

                return Ok(Some(InitializedProof {
                    proof: Self {
                        n_inputs,
                        used_inputs,
                        data: vec![0u8; 32 * (1 + n_input_tags_to_use)],
                    },
                    input_index,
                    iterations,
                }));
            }

            if iterations >= max_iterations {
                tracing::debug!(
                    iterations,
                    "No input subset contains the output asset, retry with another seed"
                );

                return Ok(None);
            }
        }
    }

    /// [`Self::initialize`] with the ring size and iteration bound taken
    /// from `config`.
    pub fn initialize_with_config(
        ctx: &Context,
        fixed_input_tags: &[FixedAssetTag],
        fixed_output_tag: &FixedAssetTag,
        config: &SurjectionConfig,
        seed: &[u8; 32],
    ) -> Result<Option<InitializedProof>> {
        Self::initialize(
            ctx,
            fixed_input_tags,
            config.inputs_to_use.min(fixed_input_tags.len()),
            fixed_output_tag,
            config.max_iterations,
            seed,
        )
    }

    /// Signs the ring picked by [`Self::initialize`].
    ///
    /// `input_index` is the input returned by initialization. The blinding
    /// keys are the blinds of the generators of that input and of the
    /// output. The proof is left untouched on failure.
    pub fn generate(
        &mut self,
        ctx: &Context,
        ephemeral_input_tags: &[Generator],
        ephemeral_output_tag: &Generator,
        input_index: usize,
        input_blinding_key: &[u8; 32],
        output_blinding_key: &[u8; 32],
    ) -> Result<()> {
        ctx.require(ContextFlags::SIGN)?;

        let input_key = scalar_from_bytes(input_blinding_key)
            .ok_or(Error::SurjectionGenerationFailed("input blinding key out of range"))?;
        let output_key = scalar_from_bytes(output_blinding_key)
            .ok_or(Error::SurjectionGenerationFailed("output blinding key out of range"))?;

        // Equal blinds are only allowed when nothing was blinded at all.
        if !bool::from(input_key.is_zero()) && input_key == output_key {
            return Err(Error::SurjectionGenerationFailed("equal blinding keys"));
        }

        if self.n_inputs != ephemeral_input_tags.len() {
            return Err(Error::CountMismatch(
                "ephemeral input tags do not match the proof inputs",
            ));
        }

        let ring_index = self
            .used_indices()
            .position(|i| i == input_index)
            .ok_or(Error::SurjectionGenerationFailed("input index is not used"))?;

        let key = output_key - input_key;
        let pubs = self.ring_public_keys(ephemeral_input_tags, ephemeral_output_tag);
        let m = message(ephemeral_input_tags, ephemeral_output_tag)
            .ok_or(Error::SurjectionGenerationFailed("generator at infinity"))?;

        let mut s = genrand(pubs.len(), &key)
            .ok_or(Error::SurjectionGenerationFailed("random value out of range"))?;

        let nonce = core::mem::replace(&mut s[ring_index], Scalar::ZERO);

        let e0 = borromean::sign(
            &mut s,
            &pubs,
            &[nonce],
            &[key],
            &[pubs.len()],
            &[ring_index],
            &m,
        )
        .ok_or_else(|| {
            tracing::debug!("Surjection proof ring signature failed");
            Error::SurjectionGenerationFailed("ring signature")
        })?;

        self.data.clear();
        self.data.extend_from_slice(&e0);
        for value in &s {
            self.data.extend_from_slice(&scalar_to_bytes(value));
        }

        Ok(())
    }

    /// Checks that `ephemeral_output_tag` is a reblinding of one of the used
    /// `ephemeral_input_tags`.
    pub fn verify(
        &self,
        _ctx: &Context,
        ephemeral_input_tags: &[Generator],
        ephemeral_output_tag: &Generator,
    ) -> bool {
        let n_used = self.n_used_inputs();

        if n_used == 0 || n_used > self.n_inputs || self.n_inputs != ephemeral_input_tags.len() {
            return false;
        }

        let Some(s) = self.signature_values() else {
            return false;
        };
        let Some(m) = message(ephemeral_input_tags, ephemeral_output_tag) else {
            return false;
        };

        let pubs = self.ring_public_keys(ephemeral_input_tags, ephemeral_output_tag);
        let mut e0 = [0u8; 32];
        e0.copy_from_slice(&self.data[..32]);

        borromean::verify(&e0, &s, &pubs, &[n_used], &m).is_some()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::ParseError("surjection proof"));
        }

        let n_inputs = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
        if n_inputs > MAX_INPUTS {
            return Err(Error::ParseError("surjection proof"));
        }

        let bitmap_len = (n_inputs + 7) / 8;
        let bitmap = bytes
            .get(2..2 + bitmap_len)
            .ok_or(Error::ParseError("surjection proof"))?;

        // No bits may be set past the last input.
        if n_inputs % 8 != 0 && bitmap[bitmap_len - 1] >> (n_inputs % 8) != 0 {
            return Err(Error::ParseError("surjection proof"));
        }

        let n_used = bitmap.iter().map(|b| b.count_ones() as usize).sum();
        if n_used > MAX_USED_INPUTS || bytes.len() != serialization_bytes(n_inputs, n_used) {
            return Err(Error::ParseError("surjection proof"));
        }

        let mut used_inputs = [0u8; BITMAP_SIZE];
        used_inputs[..bitmap_len].copy_from_slice(bitmap);

        let proof = Self {
            n_inputs,
            used_inputs,
            data: bytes[2 + bitmap_len..].to_vec(),
        };

        if proof.signature_values().is_none() {
            return Err(Error::ParseError("surjection proof"));
        }

        Ok(proof)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let bitmap_len = (self.n_inputs + 7) / 8;

        let mut out = Vec::with_capacity(self.serialized_len());
        out.extend_from_slice(&(self.n_inputs as u16).to_le_bytes());
        out.extend_from_slice(&self.used_inputs[..bitmap_len]);
        out.extend_from_slice(&self.data);
        out
    }

    pub fn serialized_len(&self) -> usize {
        serialization_bytes(self.n_inputs, self.n_used_inputs())
    }

    pub fn n_total_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn n_used_inputs(&self) -> usize {
        self.used_inputs
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum()
    }

    /// Indices of the inputs that are part of the ring, in ascending order.
    pub fn used_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_inputs).filter(|i| self.used_inputs[i / 8] & (1 << (i % 8)) != 0)
    }

    fn ring_public_keys(&self, inputs: &[Generator], output: &Generator) -> Vec<ProjectivePoint> {
        self.used_indices()
            .map(|i| output.point() - inputs[i].point())
            .collect()
    }

    fn signature_values(&self) -> Option<Vec<Scalar>> {
        self.data[32..]
            .chunks(32)
            .map(|chunk| scalar_from_bytes(chunk.try_into().ok()?))
            .collect()
    }
}

impl fmt::Display for SurjectionProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.serialize()))
    }
}

impl FromStr for SurjectionProof {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }
}

/// Hash of every input generator followed by the output one.
fn message(inputs: &[Generator], output: &Generator) -> Option<[u8; 32]> {
    let mut encoded = Vec::with_capacity(33 * (inputs.len() + 1));

    for generator in inputs.iter().chain(core::iter::once(output)) {
        encoded.extend_from_slice(&compressed(&generator.point())?);
    }

    Some(sha256(&[&encoded[..]]))
}

/// Ring member values derived from the signing key by chained hashing.
fn genrand(n: usize, key: &Scalar) -> Option<Vec<Scalar>> {
    let mut input = [0u8; 36];
    input[4..].copy_from_slice(&scalar_to_bytes(key));

    let values = (0..n)
        .map(|i| {
            input[..4].copy_from_slice(&(i as u32).to_le_bytes());

            let hash = sha256(&[&input[..]]);
            input[..32].copy_from_slice(&hash);

            scalar_from_bytes(&hash)
        })
        .collect();

    values
}

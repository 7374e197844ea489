//! Borromean range proofs over Pedersen commitments.
//!
//! A proof shows that a committed value lies in `[min_value, max_value]`
//! by splitting it into base-4 digits, committing to every digit and
//! proving with one Borromean ring per digit that each digit commitment
//! opens to one of its allowed values. Whoever knows the signing nonce can
//! rewind the proof to recover the value, the blinding factor and a short
//! message hidden in the forged ring members.

mod header;
mod rewind;

use core::fmt;
use core::str::FromStr;

use k256::elliptic_curve::group::Group;
use k256::{AffinePoint, ProjectivePoint, Scalar};

use crate::borromean;
use crate::config::RangeProofConfig;
use crate::context::{Context, ContextFlags};
use crate::errors::{Error, Result};
use crate::generator::Generator;
use crate::pedersen::Commitment;
use crate::util::{
    lift_x_quad, scalar_from_bytes, scalar_to_bytes, serialize_quad, sha256, Rfc6979HmacSha256,
};

use self::header::{ring_sizes, Header, ProveParams};

/// Size of a proof with 32 rings, the largest one possible.
pub const MAX_RANGE_PROOF_SIZE: usize = 5134;

/// Size of the buffer a message is recovered into.
pub const MAX_MESSAGE_SIZE: usize = 4096;

const MIN_EXPONENT: i32 = -1;
const MAX_EXPONENT: i32 = 18;
const MAX_MIN_BITS: u32 = 64;

/// Bytes of message every ring but the last one can carry.
const MESSAGE_BYTES_PER_RING: usize = 128;

/// Marks the forged member of the last ring that carries the proven digits.
const VALUE_MARKER: u8 = 0x80;

/// Optional prover parameters of [`RangeProof::sign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignParams<'a> {
    /// Publicly revealed lower bound of the value.
    pub min_value: u64,
    /// Base 10 exponent of the proven digits, `-1` reveals the value.
    pub exp: i32,
    /// Minimal number of bits the proven range covers.
    pub min_bits: u32,
    /// Data hidden in the proof for whoever knows the nonce.
    pub message: &'a [u8],
    /// Additional data the proof commits to.
    pub extra_commit: &'a [u8],
}

impl Default for SignParams<'_> {
    fn default() -> Self {
        Self {
            min_value: 0,
            exp: 0,
            min_bits: 0,
            message: &[],
            extra_commit: &[],
        }
    }
}

impl From<&RangeProofConfig> for SignParams<'_> {
    fn from(config: &RangeProofConfig) -> Self {
        Self {
            min_value: config.min_value,
            exp: config.exp,
            min_bits: config.min_bits,
            ..Default::default()
        }
    }
}

/// Public parameters decoded from a proof header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeProofInfo {
    /// Decimal exponent, `-1` for a proof revealing the exact value.
    pub exp: i32,
    /// Number of proven bits.
    pub mantissa: u32,
    pub min_value: u64,
    pub max_value: u64,
}

/// Everything recovered from a proof by the holder of its nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewoundProof {
    pub blinding_factor: [u8; 32],
    pub value: u64,
    pub min_value: u64,
    pub max_value: u64,
    /// Embedded message followed by zero padding.
    pub message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeProof(Vec<u8>);

impl RangeProof {
    /// Proves that `commitment` opens to `value` with blinding factor `blind`.
    ///
    /// The same `nonce` is needed to [`rewind`](Self::rewind) the proof, it
    /// must never be reused for another proof. Signing may fail with a small
    /// probability, in which case a fresh nonce should be used.
    pub fn sign(
        ctx: &Context,
        commitment: &Commitment,
        blind: &[u8; 32],
        nonce: &[u8; 32],
        value: u64,
        generator: &Generator,
        params: &SignParams,
    ) -> Result<Self> {
        ctx.require(ContextFlags::SIGN)?;

        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&params.exp) {
            return Err(Error::SignFailure("exponent out of range"));
        }
        if params.min_bits > MAX_MIN_BITS {
            return Err(Error::SignFailure("min_bits out of range"));
        }
        if params.min_value > value {
            return Err(Error::SignFailure("value is below the minimum"));
        }

        let layout = ProveParams::new(params.min_value, params.exp, params.min_bits as i32, value)
            .ok_or(Error::SignFailure("value does not fit the requested range"))?;

        let rings = layout.rings();
        let max_message = MESSAGE_BYTES_PER_RING * (rings - 1);
        if params.message.len() > max_message {
            return Err(Error::MessageTooLong {
                len: params.message.len(),
                max: max_message,
            });
        }

        tracing::trace!(
            rings,
            mantissa = layout.mantissa,
            exp = layout.exp,
            min_value = layout.min_value,
            "Range proof layout"
        );

        Self::sign_layout(
            commitment,
            blind,
            nonce,
            generator,
            params,
            &layout,
            &encode_value(layout.v),
        )
    }

    /// Signs with a chosen layout, hiding `value_slot` in the forged member
    /// of the last ring that carries the proven digits.
    fn sign_layout(
        commitment: &Commitment,
        blind: &[u8; 32],
        nonce: &[u8; 32],
        generator: &Generator,
        params: &SignParams,
        layout: &ProveParams,
        value_slot: &[u8; 32],
    ) -> Result<Self> {
        let rings = layout.rings();
        let commit = commitment.point().to_affine();
        let gen = generator.point().to_affine();
        let header = layout.header();

        let mut transcript = transcript(&commit, &gen, &header);

        let mut prep = vec![0u8; MAX_MESSAGE_SIZE];
        prep[..params.message.len()].copy_from_slice(params.message);

        let last = rings - 1;
        let last_size = layout.rsizes[last];
        if last_size > 1 {
            let mut idx = last_size - 1;
            if layout.secidx[last] == idx {
                idx -= 1;
            }

            let at = (last * 4 + idx) * 32;
            prep[at..at + 32].copy_from_slice(value_slot);
        }

        let Secrets { mut sec, mut s, valid } =
            genrand(nonce, &commit, &gen, &header, &layout.rsizes, &mut prep);
        if !valid {
            return Err(sign_failure("random value out of range"));
        }

        let k: Vec<Scalar> = (0..rings)
            .map(|i| {
                let real = i * 4 + layout.secidx[i];
                core::mem::replace(&mut s[real], Scalar::ZERO)
            })
            .collect();

        // The verifier derives the commitment of the last digit by taking
        // the others off the value commitment.
        let blind = scalar_from_bytes(blind).ok_or(Error::SignFailure("blinding factor"))?;
        sec[last] += blind;
        if bool::from(sec[last].is_zero()) {
            return Err(sign_failure("zero digit blinding factor"));
        }

        let h = generator.point();
        let mut pubs = vec![ProjectivePoint::IDENTITY; layout.npub()];
        let mut signs = vec![0u8; sign_bytes(rings)];
        let mut digits = Vec::with_capacity(last * 32);

        for i in 0..rings {
            let digit = (layout.secidx[i] as u64).wrapping_mul(layout.scale) << (2 * i);
            let public = ProjectivePoint::GENERATOR * sec[i] + h * Scalar::from(digit);

            if bool::from(public.is_identity()) {
                return Err(sign_failure("digit commitment at infinity"));
            }

            if i < last {
                let encoded = serialize_quad(&public.to_affine(), 0);

                signs[i >> 3] |= encoded[0] << (i & 7);
                transcript.extend_from_slice(&encoded);
                digits.extend_from_slice(&encoded[1..]);
            }

            pubs[i * 4] = public;
        }

        pub_expand(&mut pubs, layout.exp, &layout.rsizes, &h);

        transcript.extend_from_slice(params.extra_commit);
        let m = sha256(&[&transcript[..]]);

        let e0 = borromean::sign(
            &mut s,
            &pubs,
            &k,
            &sec,
            &layout.rsizes,
            &layout.secidx,
            &m,
        )
        .ok_or_else(|| sign_failure("ring signature"))?;

        let mut proof = Vec::with_capacity(
            header.len() + signs.len() + digits.len() + 32 * (1 + layout.npub()),
        );
        proof.extend_from_slice(&header);
        proof.extend_from_slice(&signs);
        proof.extend_from_slice(&digits);
        proof.extend_from_slice(&e0);
        for value in &s {
            proof.extend_from_slice(&scalar_to_bytes(value));
        }

        Ok(Self(proof))
    }

    /// Decodes the public parameters of the proof. Only the header is
    /// read, so no context is needed.
    pub fn info(&self) -> Result<RangeProofInfo> {
        let header = Header::parse(&self.0).ok_or(Error::DecodeError)?;

        Ok(RangeProofInfo {
            exp: header.exp,
            mantissa: header.mantissa,
            min_value: header.min_value,
            max_value: header.max_value,
        })
    }

    /// Checks the proof against `commitment`, returning the proven
    /// `(min_value, max_value)` range.
    pub fn verify_range(
        &self,
        _ctx: &Context,
        commitment: &Commitment,
        generator: &Generator,
        extra_commit: &[u8],
    ) -> Option<(u64, u64)> {
        let verified = Verified::new(&self.0, commitment, generator, extra_commit)?;

        Some((verified.header.min_value, verified.header.max_value))
    }

    pub fn verify(
        &self,
        ctx: &Context,
        commitment: &Commitment,
        generator: &Generator,
        extra_commit: &[u8],
    ) -> bool {
        self.verify_range(ctx, commitment, generator, extra_commit)
            .is_some()
    }

    /// Verifies the proof and recovers the committed value, its blinding
    /// factor and the embedded message using the nonce it was signed with.
    pub fn rewind(
        &self,
        ctx: &Context,
        commitment: &Commitment,
        nonce: &[u8; 32],
        generator: &Generator,
        extra_commit: &[u8],
    ) -> Result<RewoundProof> {
        ctx.require(ContextFlags::SIGN)?;

        let verified =
            Verified::new(&self.0, commitment, generator, extra_commit).ok_or(Error::RewindError)?;

        let commit = commitment.point().to_affine();
        let gen = generator.point().to_affine();
        let header = &self.0[..verified.header.len];

        let recovered = rewind::recover(&verified, nonce, &commit, &gen, header).ok_or_else(|| {
            tracing::debug!("Failed to recover the value of a range proof");
            Error::RewindError
        })?;

        let value = recovered
            .digits
            .checked_mul(verified.header.scale)
            .and_then(|value| value.checked_add(verified.header.min_value))
            .ok_or(Error::RewindError)?;

        let opened = ProjectivePoint::GENERATOR * recovered.blind
            + generator.point() * Scalar::from(value);
        if opened != commitment.point() {
            return Err(Error::RewindError);
        }

        Ok(RewoundProof {
            blinding_factor: scalar_to_bytes(&recovered.blind),
            value,
            min_value: verified.header.min_value,
            max_value: verified.header.max_value,
            message: recovered.message,
        })
    }

    /// Wraps serialized proof bytes, checking that the header decodes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_RANGE_PROOF_SIZE || Header::parse(bytes).is_none() {
            return Err(Error::DecodeError);
        }

        Ok(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for RangeProof {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for RangeProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for RangeProof {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }
}

fn sign_failure(reason: &'static str) -> Error {
    tracing::debug!(reason, "Range proof signing failed, retry with another nonce");
    Error::SignFailure(reason)
}

/// Number of bytes holding one sign bit per ring but the last.
fn sign_bytes(rings: usize) -> usize {
    (rings + 6) >> 3
}

/// `0x80`, seven zero bytes, then three big-endian copies of `v`.
fn encode_value(v: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[0] = VALUE_MARKER;
    for chunk in out[8..].chunks_mut(8) {
        chunk.copy_from_slice(&v.to_be_bytes());
    }
    out
}

/// Start of the hashed transcript: commitment, generator and header.
fn transcript(commit: &AffinePoint, gen: &AffinePoint, header: &[u8]) -> Vec<u8> {
    let mut transcript = Vec::with_capacity(66 + header.len() + 33 * 32);
    transcript.extend_from_slice(&serialize_quad(commit, 0));
    transcript.extend_from_slice(&serialize_quad(gen, 0));
    transcript.extend_from_slice(header);
    transcript
}

/// Fills in every ring member from the commitment of its ring: member `j`
/// of ring `i` is the first one minus `j * 4^i * 10^exp` times the
/// generator.
fn pub_expand(pubs: &mut [ProjectivePoint], exp: i32, rsizes: &[usize], generator: &ProjectivePoint) {
    let mut base = -*generator * Scalar::from(10u64.pow(exp.max(0) as u32));
    let mut offset = 0;

    for size in rsizes {
        for j in 1..*size {
            pubs[offset + j] = pubs[offset + j - 1] + base;
        }

        base = base.double().double();
        offset += size;
    }
}

/// Digit blinding factors and ring member values derived from the nonce.
struct Secrets {
    sec: Vec<Scalar>,
    s: Vec<Scalar>,
    /// Every member value was in range and non-zero.
    valid: bool,
}

/// Derives the prover's randomness from `nonce`.
///
/// Every member value is XORed with its 32-byte slot in `prep`, and the
/// result written back to it. The digit blinding factors sum to zero.
fn genrand(
    nonce: &[u8; 32],
    commit: &AffinePoint,
    gen: &AffinePoint,
    header: &[u8],
    rsizes: &[usize],
    prep: &mut [u8],
) -> Secrets {
    let mut seed = Vec::with_capacity(32 + 33 + 33 + header.len());
    seed.extend_from_slice(nonce);
    seed.extend_from_slice(&serialize_quad(commit, 0));
    seed.extend_from_slice(&serialize_quad(gen, 0));
    seed.extend_from_slice(header);

    let mut rng = Rfc6979HmacSha256::new(&seed);
    let mut tmp = [0u8; 32];

    let rings = rsizes.len();
    let mut sec = Vec::with_capacity(rings);
    let mut s = Vec::with_capacity(rsizes.iter().sum());
    let mut acc = Scalar::ZERO;
    let mut valid = true;

    for (i, size) in rsizes.iter().enumerate() {
        if i < rings - 1 {
            rng.generate(&mut tmp);

            let blind = loop {
                rng.generate(&mut tmp);

                if let Some(blind) = scalar_from_bytes(&tmp).filter(|b| !bool::from(b.is_zero())) {
                    break blind;
                }
            };

            acc += blind;
            sec.push(blind);
        } else {
            sec.push(-acc);
        }

        for j in 0..*size {
            rng.generate(&mut tmp);

            let slot = &mut prep[(i * 4 + j) * 32..(i * 4 + j + 1) * 32];
            for (byte, mask) in tmp.iter_mut().zip(slot.iter_mut()) {
                *byte ^= *mask;
                *mask = *byte;
            }

            match scalar_from_bytes(&tmp) {
                Some(value) if !bool::from(value.is_zero()) => s.push(value),
                _ => {
                    valid = false;
                    s.push(Scalar::ZERO);
                }
            }
        }
    }

    Secrets { sec, s, valid }
}

/// A proof that passed verification, with what rewinding needs.
struct Verified {
    header: Header,
    rsizes: Vec<usize>,
    s: Vec<Scalar>,
    /// Challenge of every ring member.
    challenges: Vec<Scalar>,
}

impl Verified {
    fn new(
        proof: &[u8],
        commitment: &Commitment,
        generator: &Generator,
        extra_commit: &[u8],
    ) -> Option<Self> {
        let header = Header::parse(proof)?;
        let rsizes = ring_sizes(header.mantissa);
        let rings = rsizes.len();
        let npub: usize = rsizes.iter().sum();

        let mut offset = header.len;
        if proof.len() - offset < 32 * (npub + rings - 1) + 32 + sign_bytes(rings) {
            return None;
        }

        let commit = commitment.point().to_affine();
        let h = generator.point();
        let mut transcript = transcript(&commit, &h.to_affine(), &proof[..offset]);

        let signs: Vec<u8> = (0..rings - 1)
            .map(|i| (proof[offset + (i >> 3)] >> (i & 7)) & 1)
            .collect();
        offset += sign_bytes(rings);

        // Unused sign bits must be zero, so the proof can't be mutated.
        if (rings - 1) & 7 != 0 && proof[offset - 1] >> ((rings - 1) & 7) != 0 {
            return None;
        }

        let mut pubs = vec![ProjectivePoint::IDENTITY; npub];
        let mut acc = h * Scalar::from(header.min_value);

        for (i, sign) in signs.iter().enumerate() {
            let x: [u8; 32] = proof[offset..offset + 32].try_into().ok()?;
            let mut point = ProjectivePoint::from(lift_x_quad(&x)?);
            if *sign == 1 {
                point = -point;
            }

            transcript.push(*sign);
            transcript.extend_from_slice(&x);

            pubs[i * 4] = point;
            acc += point;
            offset += 32;
        }

        let last = (rings - 1) * 4;
        pubs[last] = commitment.point() - acc;
        if bool::from(pubs[last].is_identity()) {
            return None;
        }

        pub_expand(&mut pubs, header.exp, &rsizes, &h);

        let e0: [u8; 32] = proof[offset..offset + 32].try_into().ok()?;
        offset += 32;

        let mut s = Vec::with_capacity(npub);
        for _ in 0..npub {
            let bytes: [u8; 32] = proof.get(offset..offset + 32)?.try_into().ok()?;
            s.push(scalar_from_bytes(&bytes)?);
            offset += 32;
        }

        if offset != proof.len() {
            return None;
        }

        transcript.extend_from_slice(extra_commit);
        let m = sha256(&[&transcript[..]]);

        let challenges = borromean::verify(&e0, &s, &pubs, &rsizes, &m)?;

        Some(Self {
            header,
            rsizes,
            s,
            challenges,
        })
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;
    use crate::generator::GENERATOR_H;

    static CTX: Lazy<Context> = Lazy::new(|| Context::new(ContextFlags::BOTH));

    const BLIND: [u8; 32] = [0x11; 32];
    const NONCE: [u8; 32] = [0x22; 32];

    fn commit(value: u64) -> Commitment {
        Commitment::new(&CTX, &BLIND, value, &GENERATOR_H).expect("valid commitment")
    }

    fn sign(value: u64, params: &SignParams) -> Result<RangeProof> {
        RangeProof::sign(&CTX, &commit(value), &BLIND, &NONCE, value, &GENERATOR_H, params)
    }

    #[test]
    fn test_sign_verify_and_rewind() {
        let message = b"range proofs can carry a short note";
        let params = SignParams {
            min_bits: 32,
            message,
            ..Default::default()
        };

        let proof = sign(1_000_000, &params).expect("valid proof");
        let commitment = commit(1_000_000);

        assert_eq!(
            proof.verify_range(&CTX, &commitment, &GENERATOR_H, &[]),
            Some((0, u32::MAX as u64))
        );

        let info = proof.info().expect("valid header");
        assert_eq!(info.exp, 0);
        assert_eq!(info.mantissa, 32);

        let rewound = proof
            .rewind(&CTX, &commitment, &NONCE, &GENERATOR_H, &[])
            .expect("rewinds with the signing nonce");
        assert_eq!(rewound.value, 1_000_000);
        assert_eq!(rewound.blinding_factor, BLIND);
        assert_eq!(&rewound.message[..message.len()], message);
        assert!(rewound.message[message.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_exact_value() {
        let params = SignParams {
            exp: -1,
            ..Default::default()
        };

        let proof = sign(42, &params).expect("valid proof");
        let info = proof.info().expect("valid header");
        assert_eq!(info.exp, -1);
        assert_eq!(info.mantissa, 0);
        assert_eq!(info.min_value, 42);
        assert_eq!(info.max_value, 42);

        assert!(proof.verify(&CTX, &commit(42), &GENERATOR_H, &[]));
        assert!(!proof.verify(&CTX, &commit(43), &GENERATOR_H, &[]));

        let rewound = proof
            .rewind(&CTX, &commit(42), &NONCE, &GENERATOR_H, &[])
            .expect("rewinds with the signing nonce");
        assert_eq!(rewound.value, 42);
        assert_eq!(rewound.blinding_factor, BLIND);
    }

    #[test]
    fn test_min_value_and_exponent() {
        let params = SignParams {
            min_value: 1000,
            exp: 2,
            min_bits: 0,
            ..Default::default()
        };

        let proof = sign(1_234_567, &params).expect("valid proof");
        let info = proof.info().expect("valid header");
        assert_eq!(info.exp, 2);
        assert_eq!(info.mantissa, 14);
        assert_eq!(info.min_value, 1_067);

        assert!(proof.verify(&CTX, &commit(1_234_567), &GENERATOR_H, &[]));

        let rewound = proof
            .rewind(&CTX, &commit(1_234_567), &NONCE, &GENERATOR_H, &[])
            .expect("rewinds with the signing nonce");
        assert_eq!(rewound.value, 1_234_567);
        assert_eq!(rewound.min_value, 1_067);
    }

    #[test]
    fn test_odd_mantissa() {
        for value in [0, 1, 2, 3, 5, 6, 7] {
            let proof = sign(value, &SignParams::default()).expect("valid proof");

            assert!(proof.verify(&CTX, &commit(value), &GENERATOR_H, &[]));

            let rewound = proof
                .rewind(&CTX, &commit(value), &NONCE, &GENERATOR_H, &[])
                .expect("rewinds with the signing nonce");
            assert_eq!(rewound.value, value);
        }
    }

    #[test]
    fn test_full_range_proof_size() {
        let params = SignParams {
            min_bits: 64,
            ..Default::default()
        };

        let value = u64::MAX - 7;
        let proof = sign(value, &params).expect("valid proof");

        // 32 rings without a minimum value: two header bytes, four sign
        // bytes, 31 digit commitments, e0 and 128 member values
        assert_eq!(proof.len(), 5126);
        assert!(proof.len() <= MAX_RANGE_PROOF_SIZE);
        assert!(proof.verify(&CTX, &commit(value), &GENERATOR_H, &[]));
    }

    #[test]
    fn test_extra_commit_is_bound() {
        let params = SignParams {
            min_bits: 8,
            extra_commit: b"output 0",
            ..Default::default()
        };

        let proof = sign(200, &params).expect("valid proof");

        assert!(proof.verify(&CTX, &commit(200), &GENERATOR_H, b"output 0"));
        assert!(!proof.verify(&CTX, &commit(200), &GENERATOR_H, b"output 1"));
        assert!(!proof.verify(&CTX, &commit(200), &GENERATOR_H, &[]));
    }

    #[test]
    fn test_tampered_proof_fails() {
        let proof = sign(77, &SignParams::default()).expect("valid proof");
        let commitment = commit(77);

        let mut bytes = proof.as_bytes().to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 1;
        let tampered = RangeProof::parse(&bytes).expect("header is intact");
        assert!(!tampered.verify(&CTX, &commitment, &GENERATOR_H, &[]));

        let mut bytes = proof.as_bytes().to_vec();
        bytes.push(0);
        let extended = RangeProof::parse(&bytes).expect("header is intact");
        assert!(!extended.verify(&CTX, &commitment, &GENERATOR_H, &[]));

        let other = Generator::generate(&CTX, &[7u8; 32]).expect("valid generator");
        assert!(!proof.verify(&CTX, &commitment, &other, &[]));
    }

    #[test]
    fn test_rewind_with_wrong_nonce() {
        let proof = sign(77, &SignParams::default()).expect("valid proof");

        assert_eq!(
            proof.rewind(&CTX, &commit(77), &[0x33; 32], &GENERATOR_H, &[]),
            Err(Error::RewindError)
        );
    }

    /// Signs `value` while hiding `value_slot` in place of its digits.
    fn sign_hiding(value: u64, min_bits: i32, value_slot: &[u8; 32]) -> RangeProof {
        let layout = ProveParams::new(0, 0, min_bits, value).expect("valid layout");

        RangeProof::sign_layout(
            &commit(value),
            &BLIND,
            &NONCE,
            &GENERATOR_H,
            &SignParams::default(),
            &layout,
            value_slot,
        )
        .expect("valid proof")
    }

    #[test]
    fn test_rewind_rejects_top_digit_outside_last_ring() {
        // 33 bits leave a last ring of two members, digits 2 and 3 don't exist
        for top in [2u64, 3] {
            let proof = sign_hiding(5, 33, &encode_value(5 | top << 32));

            assert_eq!(
                proof.verify_range(&CTX, &commit(5), &GENERATOR_H, &[]),
                Some((0, (1 << 33) - 1))
            );
            assert_eq!(
                proof.rewind(&CTX, &commit(5), &NONCE, &GENERATOR_H, &[]),
                Err(Error::RewindError)
            );
        }

        let proof = sign_hiding(5, 32, &encode_value(5 | 1 << 34));
        assert!(proof.verify(&CTX, &commit(5), &GENERATOR_H, &[]));
        assert_eq!(
            proof.rewind(&CTX, &commit(5), &NONCE, &GENERATOR_H, &[]),
            Err(Error::RewindError)
        );
    }

    #[test]
    fn test_rewind_rejects_digits_not_matching_commitment() {
        let proof = sign_hiding(5, 32, &encode_value(6));

        assert!(proof.verify(&CTX, &commit(5), &GENERATOR_H, &[]));
        assert_eq!(
            proof.rewind(&CTX, &commit(5), &NONCE, &GENERATOR_H, &[]),
            Err(Error::RewindError)
        );
    }

    #[test]
    fn test_rewind_without_hidden_value() {
        for min_bits in [32, 33] {
            let proof = sign_hiding(5, min_bits, &[0u8; 32]);

            assert!(proof.verify(&CTX, &commit(5), &GENERATOR_H, &[]));
            assert_eq!(
                proof.rewind(&CTX, &commit(5), &NONCE, &GENERATOR_H, &[]),
                Err(Error::RewindError)
            );
        }
    }

    #[test]
    fn test_sign_rejects_bad_params() {
        let params = SignParams {
            message: &[0u8; 129],
            min_bits: 4,
            ..Default::default()
        };
        assert_eq!(
            sign(5, &params),
            Err(Error::MessageTooLong { len: 129, max: 128 })
        );

        let params = SignParams {
            min_value: 10,
            ..Default::default()
        };
        assert!(matches!(sign(5, &params), Err(Error::SignFailure(_))));

        let params = SignParams {
            exp: 19,
            ..Default::default()
        };
        assert!(matches!(sign(5, &params), Err(Error::SignFailure(_))));

        let params = SignParams {
            min_value: 1,
            ..Default::default()
        };
        assert!(matches!(sign(u64::MAX - 1, &params), Err(Error::SignFailure(_))));
    }

    #[test]
    fn test_capabilities() {
        let verify_only = Context::new(ContextFlags::VERIFY);
        let commitment = commit(9);

        assert_eq!(
            RangeProof::sign(
                &verify_only,
                &commitment,
                &BLIND,
                &NONCE,
                9,
                &GENERATOR_H,
                &SignParams::default()
            ),
            Err(Error::MissingCapability {
                required: ContextFlags::SIGN
            })
        );

        let proof = sign(9, &SignParams::default()).expect("valid proof");
        let none = Context::new(ContextFlags::NONE);
        assert!(proof.verify(&none, &commitment, &GENERATOR_H, &[]));
        assert!(proof
            .rewind(&none, &commitment, &NONCE, &GENERATOR_H, &[])
            .is_err());
    }

    #[test]
    fn test_hex_round_trip() {
        let proof = sign(3, &SignParams::default()).expect("valid proof");

        assert_eq!(proof.to_string().parse::<RangeProof>(), Ok(proof));
        assert_eq!(RangeProof::parse(&[0u8; 10]), Err(Error::DecodeError));
    }
}

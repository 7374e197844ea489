//! Pedersen commitments `blind * G + value * generator` and the blinding
//! factor arithmetic that makes a set of commitments balance.

use core::fmt;
use core::str::FromStr;

use k256::elliptic_curve::group::Group;
use k256::{AffinePoint, ProjectivePoint, Scalar};

use crate::context::{Context, ContextFlags};
use crate::errors::{Error, Result};
use crate::generator::Generator;
use crate::keys::PublicKey;
use crate::util::{
    compressed, parse_quad, scalar_from_bytes, scalar_to_bytes, serialize_quad,
};

pub const COMMITMENT_SIZE: usize = 33;

/// Prefix of a serialized commitment, the low bit marks a y coordinate that
/// is not a quadratic residue.
const COMMITMENT_TAG: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment(AffinePoint);

impl Commitment {
    /// Commits to `value` with blinding factor `blind`.
    ///
    /// Fails with [`Error::CommitError`] when `blind` is not below the group
    /// order, or when the result is the point at infinity. In both cases a
    /// fresh blind should be picked.
    pub fn new(ctx: &Context, blind: &[u8; 32], value: u64, generator: &Generator) -> Result<Self> {
        ctx.require(ContextFlags::SIGN)?;

        let blind = scalar_from_bytes(blind).ok_or(Error::CommitError)?;

        let point = ProjectivePoint::GENERATOR * blind + generator.point() * Scalar::from(value);

        Self::from_point(point).ok_or_else(|| {
            tracing::debug!("Commitment is the point at infinity");
            Error::CommitError
        })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; COMMITMENT_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::ParseError("commitment"))?;

        parse_quad(bytes, COMMITMENT_TAG)
            .map(Self)
            .ok_or(Error::ParseError("commitment"))
    }

    pub fn serialize(&self) -> [u8; COMMITMENT_SIZE] {
        serialize_quad(&self.0, COMMITMENT_TAG)
    }

    /// Computes `sum(positive) - sum(negative)`.
    pub fn sum(positive: &[Commitment], negative: &[Commitment]) -> Result<Self> {
        Self::from_point(tally(positive, negative)).ok_or(Error::CommitError)
    }

    /// The commitment point as a public key, e.g. to check a signature made
    /// with the blinding factor of a commitment to zero.
    pub fn to_public_key(&self) -> Result<PublicKey> {
        let bytes = compressed(&self.point()).ok_or(Error::ParseError("commitment"))?;

        PublicKey::parse(&bytes)
    }

    pub(crate) fn point(&self) -> ProjectivePoint {
        ProjectivePoint::from(self.0)
    }

    fn from_point(point: ProjectivePoint) -> Option<Self> {
        if bool::from(point.is_identity()) {
            return None;
        }

        Some(Self(point.to_affine()))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.serialize()))
    }
}

impl FromStr for Commitment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }
}

fn tally(positive: &[Commitment], negative: &[Commitment]) -> ProjectivePoint {
    let positive: ProjectivePoint = positive.iter().map(Commitment::point).sum();
    let negative: ProjectivePoint = negative.iter().map(Commitment::point).sum();

    positive - negative
}

/// Checks that `sum(positive) - sum(negative)` commits to zero with a zero
/// blinding factor, i.e. is the point at infinity.
pub fn verify_tally(positive: &[Commitment], negative: &[Commitment]) -> bool {
    bool::from(tally(positive, negative).is_identity())
}

/// Computes `sum(positive) - sum(negative) mod n`.
pub fn blind_sum(positive: &[[u8; 32]], negative: &[[u8; 32]]) -> Result<[u8; 32]> {
    let mut sum = Scalar::ZERO;

    for blind in positive {
        sum += scalar_from_bytes(blind).ok_or(Error::BlindOutOfRange)?;
    }

    for blind in negative {
        sum -= scalar_from_bytes(blind).ok_or(Error::BlindOutOfRange)?;
    }

    Ok(scalar_to_bytes(&sum))
}

/// Computes the blinding factor of the last output, so that commitments
/// built on blinded generators balance.
///
/// Every entry contributes `value_i * generator_blind_i + blinding_factor_i`,
/// the first `n_inputs` entries with a negative sign. The last entry has no
/// blinding factor yet: the returned one makes the total sum zero.
pub fn blind_generator_blind_sum(
    values: &[u64],
    generator_blinds: &[[u8; 32]],
    blinding_factors: &[[u8; 32]],
    n_inputs: usize,
) -> Result<[u8; 32]> {
    if values.len() != generator_blinds.len() {
        return Err(Error::CountMismatch(
            "values and generator blinds must have the same length",
        ));
    }

    if values.len() != blinding_factors.len() + 1 {
        return Err(Error::CountMismatch(
            "there must be one blinding factor less than values",
        ));
    }

    if n_inputs > values.len() {
        return Err(Error::CountMismatch(
            "number of inputs exceeds the number of values",
        ));
    }

    let mut sum = Scalar::ZERO;

    for (i, (value, generator_blind)) in values.iter().zip(generator_blinds).enumerate() {
        let generator_blind = scalar_from_bytes(generator_blind).ok_or(Error::Overflow)?;

        let blinding_factor = match blinding_factors.get(i) {
            Some(factor) => scalar_from_bytes(factor).ok_or(Error::Overflow)?,
            None => Scalar::ZERO,
        };

        let addend = Scalar::from(*value) * generator_blind + blinding_factor;

        if i < n_inputs {
            sum -= addend;
        } else {
            sum += addend;
        }
    }

    Ok(scalar_to_bytes(&-sum))
}

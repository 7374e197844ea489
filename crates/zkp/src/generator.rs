//! Alternate generators used as the value axis of Pedersen commitments.
//!
//! A generator is derived from a 32 byte seed (usually an asset id) by
//! hashing it twice under different prefixes and mapping each hash onto the
//! curve with the Shallue-van de Woestijne map (Fouque, Tibouchi,
//! "Indifferentiable Hashing to Barreto-Naehrig Curves"). Nobody knows the
//! discrete logarithm of the result with respect to `G`.

use core::fmt;
use core::ops::Add;
use core::str::FromStr;

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::subtle::ConditionallySelectable;
use k256::{AffinePoint, FieldBytes, FieldElement, ProjectivePoint, Scalar};
use once_cell::sync::Lazy;

use crate::context::{Context, ContextFlags};
use crate::errors::{Error, Result};
use crate::util::{affine_from_coordinates, parse_quad, scalar_from_bytes, serialize_quad, sha256};

pub const GENERATOR_SIZE: usize = 33;

/// Prefix of a serialized generator, the low bit marks a y coordinate that
/// is not a quadratic residue.
const GENERATOR_TAG: u8 = 0x0a;

const FIRST_PREFIX: &[u8; 16] = b"1st generation: ";
const SECOND_PREFIX: &[u8; 16] = b"2nd generation: ";

/// sqrt(-3)
const SVDW_C: [u8; 32] = [
    0x0a, 0x2d, 0x2b, 0xa9, 0x35, 0x07, 0xf1, 0xdf, 0x23, 0x37, 0x70, 0xc2, 0xa7, 0x97, 0x96, 0x2c,
    0xc6, 0x1f, 0x6d, 0x15, 0xda, 0x14, 0xec, 0xd4, 0x7d, 0x8d, 0x27, 0xae, 0x1c, 0xd5, 0xf8, 0x52,
];

/// (sqrt(-3) - 1) / 2
const SVDW_D: [u8; 32] = [
    0x85, 0x16, 0x95, 0xd4, 0x9a, 0x83, 0xf8, 0xef, 0x91, 0x9b, 0xb8, 0x61, 0x53, 0xcb, 0xcb, 0x16,
    0x63, 0x0f, 0xb6, 0x8a, 0xed, 0x0a, 0x76, 0x6a, 0x3e, 0xc6, 0x93, 0xd6, 0x8e, 0x6a, 0xfa, 0x40,
];

const H_X: [u8; 32] = [
    0x50, 0x92, 0x9b, 0x74, 0xc1, 0xa0, 0x49, 0x54, 0xb7, 0x8b, 0x4b, 0x60, 0x35, 0xe9, 0x7a, 0x5e,
    0x07, 0x8a, 0x5a, 0x0f, 0x28, 0xec, 0x96, 0xd5, 0x47, 0xbf, 0xee, 0x9a, 0xce, 0x80, 0x3a, 0xc0,
];

const H_Y: [u8; 32] = [
    0x31, 0xd3, 0xc6, 0x86, 0x39, 0x73, 0x92, 0x6e, 0x04, 0x9e, 0x63, 0x7c, 0xb1, 0xb5, 0xf4, 0x0a,
    0x36, 0xda, 0xc2, 0x8a, 0xf1, 0x76, 0x69, 0x68, 0xc3, 0x0c, 0x23, 0x13, 0xf3, 0xa3, 0x89, 0x04,
];

struct SvdwConstants {
    c: FieldElement,
    d: FieldElement,
    b: FieldElement,
    b_plus_one: FieldElement,
}

static SVDW: Lazy<SvdwConstants> = Lazy::new(|| SvdwConstants {
    c: field_element(&SVDW_C).expect("sqrt(-3) is below the field prime"),
    d: field_element(&SVDW_D).expect("(sqrt(-3) - 1) / 2 is below the field prime"),
    b: small_field_element(7),
    b_plus_one: small_field_element(8),
});

/// The generator `H` used for explicit amounts: its x coordinate is the
/// SHA256 of the uncompressed encoding of `G`.
pub static GENERATOR_H: Lazy<Generator> = Lazy::new(|| {
    let x = field_element(&H_X).expect("x of H is below the field prime");
    let y = field_element(&H_Y).expect("y of H is below the field prime");

    Generator(affine_from_coordinates(&x, &y).expect("H is on the curve"))
});

fn field_element(bytes: &[u8; 32]) -> Option<FieldElement> {
    Option::from(FieldElement::from_bytes(FieldBytes::from_slice(bytes)))
}

fn small_field_element(value: u8) -> FieldElement {
    let mut bytes = [0u8; 32];
    bytes[31] = value;

    FieldElement::from_bytes(FieldBytes::from_slice(&bytes)).unwrap_or(FieldElement::ZERO)
}

/// `x^3 + 7`
fn curve_rhs(x: &FieldElement) -> FieldElement {
    x.square().mul(x).add(&SVDW.b).normalize()
}

/// Maps a field element onto the curve in constant time.
fn shallue_van_de_woestijne(t: &FieldElement) -> Option<AffinePoint> {
    let constants = &*SVDW;
    let one = FieldElement::ONE;

    // w = c * t / (1 + b + t^2)
    let denominator = t.square().add(&constants.b_plus_one).normalize();
    let w = constants
        .c
        .mul(t)
        .mul(&denominator.invert().unwrap_or(FieldElement::ZERO));

    // x1 = d - t * w
    let x1 = constants.d.add(&t.mul(&w).negate(1)).normalize();
    // x2 = -(x1 + 1)
    let x2 = x1.add(&one).negate(2).normalize();
    // x3 = 1 + 1 / w^2
    let x3 = one
        .add(&w.square().invert().unwrap_or(FieldElement::ZERO))
        .normalize();

    let y1 = curve_rhs(&x1).sqrt();
    let y2 = curve_rhs(&x2).sqrt();
    let y3 = curve_rhs(&x3).sqrt();

    let alpha = y1.is_some();
    let beta = y2.is_some();

    let mut x = x3;
    let mut y = y3.unwrap_or(FieldElement::ZERO);

    x.conditional_assign(&x2, beta);
    y.conditional_assign(&y2.unwrap_or(FieldElement::ZERO), beta);
    x.conditional_assign(&x1, alpha);
    y.conditional_assign(&y1.unwrap_or(FieldElement::ZERO), alpha);

    let y = y.normalize();
    let negated = y.negate(1).normalize();
    let y = FieldElement::conditional_select(&y, &negated, t.normalize().is_odd());

    affine_from_coordinates(&x.normalize(), &y)
}

fn generate_point(seed: &[u8; 32], blind: Option<&Scalar>) -> Result<AffinePoint> {
    let mut accum = match blind {
        Some(blind) => ProjectivePoint::GENERATOR * blind,
        None => ProjectivePoint::IDENTITY,
    };

    for prefix in [FIRST_PREFIX, SECOND_PREFIX] {
        let hash = sha256(&[&prefix[..], &seed[..]]);
        let t = field_element(&hash).ok_or(Error::GenerationFailed)?;
        let point = shallue_van_de_woestijne(&t).ok_or(Error::GenerationFailed)?;

        accum += ProjectivePoint::from(point);
    }

    if bool::from(accum.is_identity()) {
        return Err(Error::GenerationFailed);
    }

    Ok(accum.to_affine())
}

/// A curve point with unknown discrete logarithm with respect to `G`.
///
/// Kept apart from [`crate::PublicKey`], so one can't be passed where the
/// other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator(AffinePoint);

impl Generator {
    /// Derives a generator from `seed`.
    pub fn generate(_ctx: &Context, seed: &[u8; 32]) -> Result<Self> {
        generate_point(seed, None).map(Self)
    }

    /// Derives a generator from `seed` and adds `blind * G`, hiding which
    /// seed it came from.
    pub fn generate_blinded(ctx: &Context, seed: &[u8; 32], blind: &[u8; 32]) -> Result<Self> {
        ctx.require(ContextFlags::SIGN)?;

        let blind = scalar_from_bytes(blind).ok_or(Error::BlindOutOfRange)?;

        generate_point(seed, Some(&blind)).map(Self)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; GENERATOR_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::ParseError("generator"))?;

        parse_quad(bytes, GENERATOR_TAG)
            .map(Self)
            .ok_or(Error::ParseError("generator"))
    }

    pub fn serialize(&self) -> [u8; GENERATOR_SIZE] {
        serialize_quad(&self.0, GENERATOR_TAG)
    }

    pub(crate) fn point(&self) -> ProjectivePoint {
        ProjectivePoint::from(self.0)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.serialize()))
    }
}

impl FromStr for Generator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }
}

//! Point and scalar helpers shared by the commitment and proof engines.

use bitcoin::hashes::{hmac, sha256, Hash, HashEngine};
use k256::elliptic_curve::ff::PrimeField;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::subtle::Choice;
use k256::{AffinePoint, EncodedPoint, FieldBytes, FieldElement, ProjectivePoint, Scalar};

/// Parses a big-endian scalar, `None` if it is not below the group order.
pub(crate) fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(*FieldBytes::from_slice(bytes)))
}

pub(crate) fn scalar_to_bytes(scalar: &Scalar) -> [u8; 32] {
    to_array(&scalar.to_bytes())
}

pub(crate) fn to_array(bytes: &FieldBytes) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    out
}

pub(crate) fn x_bytes(point: &AffinePoint) -> [u8; 32] {
    to_array(&point.x())
}

/// Whether the y coordinate of `point` is a quadratic residue.
pub(crate) fn has_quad_y(point: &AffinePoint) -> bool {
    let encoded = point.to_encoded_point(false);

    let Some(y) = encoded.y() else {
        return false;
    };

    bool::from(FieldElement::from_bytes(y).and_then(|y| y.sqrt()).is_some())
}

/// Lifts `x` to the curve point whose y coordinate is a quadratic residue.
pub(crate) fn lift_x_quad(x: &[u8; 32]) -> Option<AffinePoint> {
    let point: AffinePoint =
        Option::from(AffinePoint::decompress(FieldBytes::from_slice(x), Choice::from(0)))?;

    if has_quad_y(&point) {
        Some(point)
    } else {
        Some(-point)
    }
}

/// Serializes `point` as `tag | y-is-not-residue` followed by x.
///
/// `tag` must be even.
pub(crate) fn serialize_quad(point: &AffinePoint, tag: u8) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = tag | u8::from(!has_quad_y(point));
    out[1..].copy_from_slice(&x_bytes(point));
    out
}

/// Inverse of [`serialize_quad`].
pub(crate) fn parse_quad(bytes: &[u8; 33], tag: u8) -> Option<AffinePoint> {
    if bytes[0] & 0xFE != tag {
        return None;
    }

    let mut x = [0u8; 32];
    x.copy_from_slice(&bytes[1..]);

    let point = lift_x_quad(&x)?;

    if bytes[0] & 1 == 1 {
        Some(-point)
    } else {
        Some(point)
    }
}

/// SEC1 compressed encoding, `None` for the point at infinity.
pub(crate) fn compressed(point: &ProjectivePoint) -> Option<[u8; 33]> {
    let encoded = point.to_affine().to_encoded_point(true);
    let bytes = encoded.as_bytes();

    if bytes.len() != 33 {
        return None;
    }

    let mut out = [0u8; 33];
    out.copy_from_slice(bytes);
    Some(out)
}

pub(crate) fn affine_from_coordinates(x: &FieldElement, y: &FieldElement) -> Option<AffinePoint> {
    let encoded = EncodedPoint::from_affine_coordinates(&x.to_bytes(), &y.to_bytes(), false);

    Option::from(AffinePoint::from_encoded_point(&encoded))
}

pub(crate) fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut engine = sha256::Hash::engine();

    for part in parts {
        engine.input(part);
    }

    sha256::Hash::from_engine(engine).to_byte_array()
}

fn hmac_sha256(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut engine = hmac::HmacEngine::<sha256::Hash>::new(key);

    for part in parts {
        engine.input(part);
    }

    hmac::Hmac::<sha256::Hash>::from_engine(engine).to_byte_array()
}

/// Deterministic byte stream following the HMAC-SHA256 DRBG of RFC 6979,
/// section 3.2.
pub(crate) struct Rfc6979HmacSha256 {
    v: [u8; 32],
    k: [u8; 32],
    retry: bool,
}

impl Rfc6979HmacSha256 {
    pub(crate) fn new(seed: &[u8]) -> Self {
        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        k = hmac_sha256(&k, &[&v[..], &[0x00u8][..], seed]);
        v = hmac_sha256(&k, &[&v[..]]);
        k = hmac_sha256(&k, &[&v[..], &[0x01u8][..], seed]);
        v = hmac_sha256(&k, &[&v[..]]);

        Self { v, k, retry: false }
    }

    pub(crate) fn generate(&mut self, out: &mut [u8]) {
        if self.retry {
            self.k = hmac_sha256(&self.k, &[&self.v[..], &[0x00u8][..]]);
            self.v = hmac_sha256(&self.k, &[&self.v[..]]);
        }

        for chunk in out.chunks_mut(32) {
            self.v = hmac_sha256(&self.k, &[&self.v[..]]);
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }

        self.retry = true;
    }
}

impl Drop for Rfc6979HmacSha256 {
    fn drop(&mut self) {
        self.v = [0u8; 32];
        self.k = [0u8; 32];
    }
}

#[cfg(test)]
mod tests {
    use k256::elliptic_curve::group::Group;

    use super::*;

    #[test]
    fn test_rfc6979_stream() {
        let seed: Vec<u8> = (0u8..32).collect();
        let mut rng = Rfc6979HmacSha256::new(&seed);

        let mut out = [0u8; 32];
        rng.generate(&mut out);
        assert_eq!(
            hex::encode(out),
            "3226437dd9f98b17591aad731383303213439f64d029a5764e84e36256ddeb79"
        );

        rng.generate(&mut out);
        assert_eq!(
            hex::encode(out),
            "68ddf0df052af113ad632143c8039de47a598a6186f18fd474eac12f1dece475"
        );
    }

    #[test]
    fn test_quad_encoding_round_trip() {
        for k in 1u64..16 {
            let point = (ProjectivePoint::GENERATOR * Scalar::from(k)).to_affine();

            for tag in [8u8, 10] {
                let bytes = serialize_quad(&point, tag);
                assert_eq!(parse_quad(&bytes, tag), Some(point));
                assert_eq!(parse_quad(&bytes, tag ^ 2), None);
            }
        }
    }

    #[test]
    fn test_lifted_point_has_residue_y() {
        let point = (ProjectivePoint::GENERATOR * Scalar::from(5u64)).to_affine();
        let lifted = lift_x_quad(&x_bytes(&point)).expect("x is on the curve");

        assert!(has_quad_y(&lifted));
        assert!(!has_quad_y(&-lifted));
    }

    #[test]
    fn test_scalar_bounds() {
        assert!(scalar_from_bytes(&[0xFF; 32]).is_none());
        assert_eq!(scalar_from_bytes(&[0u8; 32]), Some(Scalar::ZERO));
        assert_eq!(
            scalar_from_bytes(&scalar_to_bytes(&Scalar::ONE)),
            Some(Scalar::ONE)
        );
    }

    #[test]
    fn test_identity_has_no_compressed_encoding() {
        assert!(compressed(&ProjectivePoint::identity()).is_none());
        assert!(compressed(&ProjectivePoint::GENERATOR).is_some());
    }
}

//! Borromean ring signatures (Maxwell, Poelstra 2015).
//!
//! Several rings of public keys share one closing challenge `e0`. A valid
//! signature proves knowledge of one discrete logarithm per ring without
//! revealing which member it belongs to.

use k256::elliptic_curve::group::Group;
use k256::{ProjectivePoint, Scalar};

use crate::util::{compressed, scalar_from_bytes, sha256};

/// Challenge of member `index` in ring `ring`: `H(e || m || ring || index)`.
fn challenge(e: &[u8], m: &[u8], ring: usize, index: usize) -> Option<Scalar> {
    let hash = sha256(&[
        e,
        m,
        &(ring as u32).to_be_bytes()[..],
        &(index as u32).to_be_bytes()[..],
    ]);

    scalar_from_bytes(&hash).filter(|e| !bool::from(e.is_zero()))
}

/// `e * P + s * G` in compressed form, `None` at infinity.
fn ring_link(public: &ProjectivePoint, e: &Scalar, s: &Scalar) -> Option<[u8; 33]> {
    compressed(&(*public * e + ProjectivePoint::GENERATOR * s))
}

/// Fills the real members of `s` and returns the closing challenge.
///
/// `s` holds one value per ring member. The forged ones must already be set,
/// `k` holds one nonce and `sec` one secret key per ring, `secidx` points at
/// the member of each ring whose key is known.
pub(crate) fn sign(
    s: &mut [Scalar],
    pubs: &[ProjectivePoint],
    k: &[Scalar],
    sec: &[Scalar],
    rsizes: &[usize],
    secidx: &[usize],
    m: &[u8],
) -> Option<[u8; 32]> {
    let mut closing = Vec::with_capacity(rsizes.len() * 33);
    let mut offset = 0;

    for (i, size) in rsizes.iter().enumerate() {
        let mut link = compressed(&(ProjectivePoint::GENERATOR * k[i]))?;

        for j in secidx[i] + 1..*size {
            let e = challenge(&link, m, i, j)?;
            link = ring_link(&pubs[offset + j], &e, &s[offset + j])?;
        }

        closing.extend_from_slice(&link);
        offset += size;
    }

    let e0 = sha256(&[&closing[..], m]);

    offset = 0;
    for (i, size) in rsizes.iter().enumerate() {
        let mut e = challenge(&e0, m, i, 0)?;

        for j in 0..secidx[i] {
            let link = ring_link(&pubs[offset + j], &e, &s[offset + j])?;
            e = challenge(&link, m, i, j + 1)?;
        }

        let real = k[i] - e * sec[i];
        if bool::from(real.is_zero()) {
            return None;
        }

        s[offset + secidx[i]] = real;
        offset += size;
    }

    Some(e0)
}

/// Verifies the signature, returning the challenge of every ring member.
///
/// The challenges let the holder of the signing nonces recover data hidden
/// in the signature.
pub(crate) fn verify(
    e0: &[u8; 32],
    s: &[Scalar],
    pubs: &[ProjectivePoint],
    rsizes: &[usize],
    m: &[u8],
) -> Option<Vec<Scalar>> {
    let mut challenges = Vec::with_capacity(s.len());
    let mut closing = Vec::with_capacity(rsizes.len() * 33);
    let mut count = 0;

    for (i, size) in rsizes.iter().enumerate() {
        let mut e = challenge(e0, m, i, 0)?;

        for j in 0..*size {
            if bool::from(s[count].is_zero()) || bool::from(pubs[count].is_identity()) {
                return None;
            }

            challenges.push(e);

            let link = ring_link(&pubs[count], &e, &s[count])?;

            if j != size - 1 {
                e = challenge(&link, m, i, j + 1)?;
            } else {
                closing.extend_from_slice(&link);
            }

            count += 1;
        }
    }

    if sha256(&[&closing[..], m]) != *e0 {
        return None;
    }

    Some(challenges)
}

use k256::{AffinePoint, Scalar};

use super::{genrand, Secrets, Verified, MAX_MESSAGE_SIZE, VALUE_MARKER};
use crate::util::scalar_to_bytes;

/// What the holder of the nonce learns from a valid proof.
pub(super) struct Recovered {
    pub blind: Scalar,
    /// Value of the proven digits, before scaling and adding the minimum.
    pub digits: u64,
    pub message: Vec<u8>,
}

/// Recovers the secret `x` of a ring member from its nonce: `(k - s) / e`.
fn recover_x(k: &Scalar, e: &Scalar, s: &Scalar) -> Option<Scalar> {
    let inverse: Option<Scalar> = e.invert().into();

    Some((*k - s) * inverse?)
}

/// Recovers the nonce of a ring member from its secret: `s + e * x`.
fn recover_k(x: &Scalar, e: &Scalar, s: &Scalar) -> Scalar {
    *s + *e * x
}

/// Reverses the value encoding of the forged member, `None` if `bytes`
/// does not hold one.
fn decode_value(bytes: &[u8; 32]) -> Option<u64> {
    if bytes[0] & VALUE_MARKER == 0 || bytes[8..16] != bytes[16..24] || bytes[16..24] != bytes[24..]
    {
        return None;
    }

    let mut value = [0u8; 8];
    value.copy_from_slice(&bytes[24..]);

    Some(u64::from_be_bytes(value))
}

fn xor_slot(scalar: &Scalar, slot: &[u8]) -> [u8; 32] {
    let mut bytes = scalar_to_bytes(scalar);
    for (byte, mask) in bytes.iter_mut().zip(slot) {
        *byte ^= mask;
    }
    bytes
}

/// Replays the prover's randomness and takes it off the forged ring
/// members, revealing the value, blinding factor and message.
pub(super) fn recover(
    proof: &Verified,
    nonce: &[u8; 32],
    commit: &AffinePoint,
    gen: &AffinePoint,
    header: &[u8],
) -> Option<Recovered> {
    let rsizes = &proof.rsizes;
    let (s, ev) = (&proof.s, &proof.challenges);

    let mut prep = vec![0u8; MAX_MESSAGE_SIZE];
    let Secrets {
        sec, s: s_orig, ..
    } = genrand(nonce, commit, gen, header, rsizes, &mut prep);

    let rings = rsizes.len();
    let last = rings - 1;
    let last_size = rsizes[last];

    // An exact value proof only hides the blinding factor.
    if last_size == 1 {
        return Some(Recovered {
            blind: recover_x(&s_orig[0], &ev[0], &s[0])?,
            digits: 0,
            message: Vec::new(),
        });
    }

    let last_start = last * 4;

    let digits = (0..2).find_map(|j| {
        let idx = last_start + last_size - 1 - j;
        let bytes = xor_slot(&s[idx], &prep[idx * 32..(idx + 1) * 32]);

        decode_value(&bytes).map(|digits| {
            prep[idx * 32..(idx + 1) * 32].copy_from_slice(&bytes);
            digits
        })
    })?;

    // The digits come from the proof and may not fit the ring layout.
    let top_digit = usize::try_from(digits >> (2 * last)).ok()?;
    if top_digit >= last_size {
        return None;
    }
    let mut skip1 = last_size - 1;
    if top_digit == skip1 {
        skip1 -= 1;
    }
    let skip2 = top_digit & 3;
    if skip1 == skip2 {
        return None;
    }
    let (skip1, skip2) = (last_start + skip1, last_start + skip2);

    let blind = recover_x(&s_orig[skip2], &ev[skip2], &s[skip2])? - sec[last];

    let mut message = Vec::with_capacity(32 * (s.len() - 2));
    let mut npub = 0;

    for (i, size) in rsizes.iter().enumerate() {
        let real = ((digits >> (2 * i)) & 3) as usize;

        for j in 0..*size {
            if npub == skip1 || npub == skip2 {
                npub += 1;
                continue;
            }

            // The real member hides its message bytes in the nonce.
            let value = if real == j {
                recover_k(&sec[i], &ev[npub], &s[npub])
            } else {
                s[npub]
            };

            message.extend_from_slice(&xor_slot(&value, &prep[npub * 32..(npub + 1) * 32]));
            npub += 1;
        }
    }
    message.truncate(MAX_MESSAGE_SIZE);

    Some(Recovered {
        blind,
        digits,
        message,
    })
}

//! Ring layout of a range proof and its public header.
//!
//! The proven amount is `min_value + mantissa_value * 10^exp`, with the
//! mantissa value written in base 4: one ring of four keys per digit, or
//! of two keys for the top bit of an odd mantissa.

/// Shortest proof a valid header can belong to.
const MIN_PROOF_SIZE: usize = 65;
const MAX_EXPONENT: i32 = 18;
const MAX_MANTISSA: u32 = 64;

const FLAG_RESERVED: u8 = 0x80;
const FLAG_HAS_RANGE: u8 = 0x40;
const FLAG_HAS_MIN: u8 = 0x20;
const EXPONENT_MASK: u8 = 0x1f;

/// Ring sizes for a given mantissa, `[1]` for an exact value.
pub(super) fn ring_sizes(mantissa: u32) -> Vec<usize> {
    if mantissa == 0 {
        return vec![1];
    }

    let mut rsizes = vec![4; (mantissa >> 1) as usize];
    if mantissa & 1 == 1 {
        rsizes.push(2);
    }

    rsizes
}

/// Parameters chosen by the prover for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ProveParams {
    /// Value of the mantissa, `(value - min_value) / scale`.
    pub v: u64,
    pub rsizes: Vec<usize>,
    /// Base-4 digit of `v` per ring, i.e. the index of the real key.
    pub secidx: Vec<usize>,
    pub min_value: u64,
    pub mantissa: u32,
    pub scale: u64,
    pub exp: i32,
}

impl ProveParams {
    /// Picks the layout proving `value` with at least `min_bits` bits of
    /// range. An exponent of `-1` proves the exact value.
    ///
    /// Returns `None` when either `value` or `min_value` is at least
    /// `2^63 - 1` while the other one is not zero.
    pub fn new(min_value: u64, exp: i32, min_bits: i32, value: u64) -> Option<Self> {
        let mut exp = exp;
        let mut min_bits = min_bits;

        // There is no room left for a range above `u64::MAX`.
        if min_value == u64::MAX {
            exp = -1;
        }

        if exp < 0 {
            return Some(Self {
                v: 0,
                rsizes: vec![1],
                secidx: vec![0],
                min_value: value,
                mantissa: 0,
                scale: 1,
                exp: 0,
            });
        }

        let half = i64::MAX as u64;
        if (min_value != 0 && value > half) || (value != 0 && min_value >= half) {
            return None;
        }

        let max_bits = if min_value != 0 {
            min_value.leading_zeros() as i32
        } else {
            64
        };
        min_bits = min_bits.min(max_bits);

        // Scaling by powers of ten would push the range past `2^64`.
        if min_bits > 61 || value > half {
            exp = 0;
        }

        let mut v = value - min_value;
        let mut v2 = if min_bits > 0 {
            u64::MAX >> (64 - min_bits)
        } else {
            0
        };

        let mut digits = 0;
        while digits < exp && v2 <= u64::MAX / 10 {
            v /= 10;
            v2 *= 10;
            digits += 1;
        }
        let exp = digits;

        let scale = 10u64.pow(exp as u32);
        let min_value = value - v * scale;

        let mantissa = if v != 0 { 64 - v.leading_zeros() } else { 1 };
        let mantissa = mantissa.max(min_bits.max(0) as u32);

        let rsizes = ring_sizes(mantissa);
        let secidx = (0..rsizes.len())
            .map(|i| ((v >> (i * 2)) & 3) as usize)
            .collect();

        Some(Self {
            v,
            rsizes,
            secidx,
            min_value,
            mantissa,
            scale,
            exp,
        })
    }

    pub fn rings(&self) -> usize {
        self.rsizes.len()
    }

    pub fn npub(&self) -> usize {
        self.rsizes.iter().sum()
    }

    pub fn header(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(10);
        let has_range = self.rsizes[0] > 1;

        let mut flags = 0;
        if has_range {
            flags |= FLAG_HAS_RANGE | self.exp as u8;
        }
        if self.min_value != 0 {
            flags |= FLAG_HAS_MIN;
        }
        header.push(flags);

        if has_range {
            header.push((self.mantissa - 1) as u8);
        }

        if self.min_value != 0 {
            header.extend_from_slice(&self.min_value.to_be_bytes());
        }

        header
    }
}

/// Public part of a range proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header {
    /// Decimal exponent, `-1` for a proof of an exact value.
    pub exp: i32,
    pub mantissa: u32,
    pub scale: u64,
    pub min_value: u64,
    pub max_value: u64,
    /// Number of header bytes.
    pub len: usize,
}

impl Header {
    pub fn parse(proof: &[u8]) -> Option<Self> {
        if proof.len() < MIN_PROOF_SIZE || proof[0] & FLAG_RESERVED != 0 {
            return None;
        }

        let has_range = proof[0] & FLAG_HAS_RANGE != 0;
        let has_min = proof[0] & FLAG_HAS_MIN != 0;

        let mut offset = 0;
        let mut exp = -1;
        let mut mantissa = 0;
        let mut max_value = 0u64;

        if has_range {
            exp = (proof[0] & EXPONENT_MASK) as i32;
            offset += 1;

            if exp > MAX_EXPONENT {
                return None;
            }

            mantissa = proof[offset] as u32 + 1;
            if mantissa > MAX_MANTISSA {
                return None;
            }

            max_value = u64::MAX >> (64 - mantissa);
        }
        offset += 1;

        let mut scale = 1u64;
        for _ in 0..exp.max(0) {
            if max_value > u64::MAX / 10 {
                return None;
            }

            max_value *= 10;
            scale *= 10;
        }

        let mut min_value = 0;
        if has_min {
            let bytes: [u8; 8] = proof.get(offset..offset + 8)?.try_into().ok()?;

            min_value = u64::from_be_bytes(bytes);
            offset += 8;
        }

        max_value = max_value.checked_add(min_value)?;

        Some(Self {
            exp,
            mantissa,
            scale,
            min_value,
            max_value,
            len: offset,
        })
    }
}

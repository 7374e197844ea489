//! Prover defaults, deserializable from the `[rangeproof]` and `[surjection]`
//! sections of a config file.

/// Default lower bound revealed by range proofs.
pub const DEFAULT_MIN_VALUE: u64 = 0;
/// Default base 10 exponent of range proofs.
pub const DEFAULT_EXP: i32 = 0;
/// Default number of bits covered by range proofs, enough for any amount
/// of a 21 million coin supply in its smallest unit.
pub const DEFAULT_MIN_BITS: u32 = 52;

/// Default number of inputs a surjection proof ring is built from.
pub const DEFAULT_INPUTS_TO_USE: usize = 3;
/// Default number of input subsets tried by surjection proof selection.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ProverConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub rangeproof: RangeProofConfig,

    #[cfg_attr(feature = "serde", serde(default))]
    pub surjection: SurjectionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct RangeProofConfig {
    #[cfg_attr(feature = "serde", serde(default = "default_min_value"))]
    pub min_value: u64,

    /// `-1` makes proofs reveal the exact value.
    #[cfg_attr(feature = "serde", serde(default = "default_exp"))]
    pub exp: i32,

    #[cfg_attr(feature = "serde", serde(default = "default_min_bits"))]
    pub min_bits: u32,
}

fn default_min_value() -> u64 {
    DEFAULT_MIN_VALUE
}

fn default_exp() -> i32 {
    DEFAULT_EXP
}

fn default_min_bits() -> u32 {
    DEFAULT_MIN_BITS
}

impl Default for RangeProofConfig {
    fn default() -> Self {
        Self {
            min_value: default_min_value(),
            exp: default_exp(),
            min_bits: default_min_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SurjectionConfig {
    /// Capped at the number of inputs available.
    #[cfg_attr(feature = "serde", serde(default = "default_inputs_to_use"))]
    pub inputs_to_use: usize,

    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
}

fn default_inputs_to_use() -> usize {
    DEFAULT_INPUTS_TO_USE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SurjectionConfig {
    fn default() -> Self {
        Self {
            inputs_to_use: default_inputs_to_use(),
            max_iterations: default_max_iterations(),
        }
    }
}

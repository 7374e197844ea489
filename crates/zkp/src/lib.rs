//! Confidential transaction primitives over secp256k1: Pedersen commitments
//! to amounts over per-asset generators, Borromean range proofs hiding the
//! amounts and surjection proofs hiding which input asset an output spends.

pub use asset::FixedAssetTag;
pub use config::{ProverConfig, RangeProofConfig, SurjectionConfig};
pub use context::{Context, ContextFlags};
pub use ecdh::ecdh;
pub use errors::{Error, Result};
pub use generator::{Generator, GENERATOR_H};
pub use keys::{PrivateKey, PublicKey};
pub use pedersen::{blind_generator_blind_sum, blind_sum, verify_tally, Commitment};
pub use rangeproof::{RangeProof, RangeProofInfo, RewoundProof, SignParams};
pub use surjection::{InitializedProof, SurjectionProof};

pub use bitcoin::secp256k1;
pub use k256;

pub mod asset;
pub mod config;
mod context;
mod ecdh;
mod errors;
pub mod generator;
pub mod keys;
pub mod pedersen;
pub mod rangeproof;
pub mod surjection;

mod borromean;
mod util;

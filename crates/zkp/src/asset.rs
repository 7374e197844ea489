//! Fixed asset tags, the unblinded identity of an asset.

use core::fmt;
use core::str::FromStr;

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::generator::Generator;

pub const ASSET_TAG_SIZE: usize = 32;

/// 32 opaque bytes naming an asset. Its generator is derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedAssetTag([u8; ASSET_TAG_SIZE]);

impl FixedAssetTag {
    pub const fn new(bytes: [u8; ASSET_TAG_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; ASSET_TAG_SIZE] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: ASSET_TAG_SIZE,
            actual: bytes.len(),
        })?;

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ASSET_TAG_SIZE] {
        &self.0
    }

    /// Unblinded generator of the asset.
    pub fn generator(&self, ctx: &Context) -> Result<Generator> {
        Generator::generate(ctx, &self.0)
    }

    /// Generator of the asset blinded with `blind`, as it appears on an
    /// ephemeral output.
    pub fn blinded_generator(&self, ctx: &Context, blind: &[u8; 32]) -> Result<Generator> {
        Generator::generate_blinded(ctx, &self.0, blind)
    }
}

impl From<[u8; ASSET_TAG_SIZE]> for FixedAssetTag {
    fn from(bytes: [u8; ASSET_TAG_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for FixedAssetTag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for FixedAssetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for FixedAssetTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(&hex::decode(s)?)
    }
}

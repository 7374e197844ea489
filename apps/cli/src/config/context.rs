use std::str::FromStr;

use confidential_zkp::ContextFlags;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct ContextConfig {
    /// One of `none`, `sign`, `verify` or `both`.
    #[serde(default = "default_flags", deserialize_with = "deserialize_flags")]
    pub flags: ContextFlags,

    /// Hex encoded 32 bytes the context is randomized with.
    #[serde(default, deserialize_with = "deserialize_seed")]
    pub seed: Option<[u8; 32]>,
}

fn default_flags() -> ContextFlags {
    ContextFlags::BOTH
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            flags: default_flags(),
            seed: None,
        }
    }
}

fn deserialize_flags<'de, D>(deserializer: D) -> Result<ContextFlags, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    ContextFlags::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_seed<'de, D>(deserializer: D) -> Result<Option<[u8; 32]>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    crate::actions::parse_hex32(&s)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

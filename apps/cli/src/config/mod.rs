use std::path::Path;

use color_eyre::eyre;
use confidential_zkp::ProverConfig;
use serde::Deserialize;

pub use context::ContextConfig;
pub use logger::LoggerConfig;

mod context;
mod logger;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub logger: LoggerConfig,

    /// The `[rangeproof]` and `[surjection]` sections.
    #[serde(flatten)]
    pub prover: ProverConfig,
}

impl Config {
    /// Loads the config file at `path`, or the defaults if there is none.
    pub fn from_path(path: &Path) -> eyre::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

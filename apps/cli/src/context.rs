use confidential_zkp as zkp;

use crate::config::Config;

/// Holds the loaded configuration and the proving context every command
/// works with.
pub struct Context {
    config: Config,

    /// Created with the flags from the config file and randomized with its
    /// seed, if one is set.
    zkp: zkp::Context,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let mut zkp = zkp::Context::new(config.context.flags);

        if let Some(seed) = &config.context.seed {
            zkp.randomize(seed);
        }

        tracing::debug!(flags = %zkp.flags(), "Created context");

        Self { config, zkp }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn zkp(&self) -> &zkp::Context {
        &self.zkp
    }
}

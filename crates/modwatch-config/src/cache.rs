//! Thread-safe configuration caching with arc-swap for lock-free reads.

use crate::loader::ConfigError;
use crate::schema::Config;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Configuration shared between commands and background tasks.
///
/// Readers never block; a replacement is only accepted once it validates.
#[derive(Debug)]
pub struct ConfigCache {
    config: ArcSwap<Config>,
}

impl ConfigCache {
    /// Creates a new configuration cache with the given initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Gets the current configuration.
    pub fn get(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Replaces the configuration if it validates, returning the previous one.
    pub fn replace(&self, config: Config) -> Result<Arc<Config>, ConfigError> {
        config.validate().map_err(ConfigError::Validation)?;
        let previous = self.config.swap(Arc::new(config));
        info!("Configuration replaced");
        Ok(previous)
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

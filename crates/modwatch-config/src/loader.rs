//! Configuration loading from YAML or TOML files with environment overrides.

use crate::schema::Config;
use crate::validator::ValidationIssue;
use modwatch_common::ModwatchError;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "MODWATCH_CONFIG_PATH";

/// Files probed, in order, when no explicit path is given.
const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error.
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment variable parsing error.
    #[error("Failed to parse environment variable '{var}': {reason}")]
    EnvParse {
        /// Variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Configuration validation error.
    #[error("Configuration validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for ModwatchError {
    fn from(err: ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

/// Configuration loader for the application.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `MODWATCH_CONFIG_PATH`, the first default file
    /// present in the working directory, or built-in defaults, then applies
    /// environment overrides and validates the result.
    pub fn load() -> Result<Config, ConfigError> {
        let explicit = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let found = explicit.or_else(|| {
            DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
        });

        let mut config = match found {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Loads and validates configuration from a specific file, with environment overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let mut config = Self::parse_file(path.as_ref())?;
        Self::apply_env_overrides(&mut config)?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Parses a file without overrides or validation. `.toml` files are read
    /// as TOML, everything else as YAML.
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parses a YAML document into a configuration.
    pub fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to configuration.
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(token) = env::var("DISCORD_TOKEN") {
            config.discord.token = token;
        }
        if let Some(id) = parse_env("MODWATCH_GUILD_ID")? {
            config.discord.guild_id = id;
        }
        if let Some(id) = parse_env("MODWATCH_MUTED_ROLE_ID")? {
            config.discord.muted_role_id = id;
        }
        if let Some(id) = parse_env("MODWATCH_LOG_CHANNEL_ID")? {
            config.discord.log_channel_id = id;
        }
        if let Ok(path) = env::var("MODWATCH_STATE_PATH") {
            config.storage.state_path = PathBuf::from(path);
        }
        if let Some(seconds) = parse_env("MODWATCH_TICK_INTERVAL")? {
            config.tracking.tick_interval_seconds = seconds;
        }
        if let Some(seconds) = parse_env("MODWATCH_INACTIVITY_THRESHOLD")? {
            config.tracking.inactivity_threshold_seconds = seconds;
        }
        if let Ok(level) = env::var("MODWATCH_LOG_LEVEL") {
            config.logging.level = level;
        }

        debug!("Applied environment overrides");
        Ok(())
    }
}

fn parse_env<T>(var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::EnvParse {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

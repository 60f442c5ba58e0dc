//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use thiserror::Error;

/// A single rule a configuration broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// The bot token is empty.
    #[error("discord.token cannot be empty")]
    MissingToken,
    /// The reconciliation interval is zero.
    #[error("tracking.tick_interval_seconds must be greater than zero")]
    ZeroTickInterval,
    /// The inactivity threshold is zero.
    #[error("tracking.inactivity_threshold_seconds must be greater than zero")]
    ZeroInactivityThreshold,
    /// The state file path is empty.
    #[error("storage.state_path cannot be empty")]
    EmptyStatePath,
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Collects every rule the configuration breaks.
    pub fn issues(config: &Config) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if config.discord.token.trim().is_empty() {
            issues.push(ValidationIssue::MissingToken);
        }
        if config.tracking.tick_interval_seconds == 0 {
            issues.push(ValidationIssue::ZeroTickInterval);
        }
        if config.tracking.inactivity_threshold_seconds == 0 {
            issues.push(ValidationIssue::ZeroInactivityThreshold);
        }
        if config.storage.state_path.as_os_str().is_empty() {
            issues.push(ValidationIssue::EmptyStatePath);
        }

        issues
    }

    /// Validates a configuration, failing on the first broken rule set.
    pub fn validate(config: &Config) -> Result<(), Vec<ValidationIssue>> {
        let issues = Self::issues(config);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        ConfigValidator::validate(self)
    }
}

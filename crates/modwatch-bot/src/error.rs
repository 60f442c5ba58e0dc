//! Application-wide error types using thiserror.

use modwatch_common::ModwatchError;
use modwatch_config::ConfigError;
use modwatch_tracker::TrackerError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("{0}")]
    Common(#[from] ModwatchError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// The tracker failed to start or stop cleanly.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

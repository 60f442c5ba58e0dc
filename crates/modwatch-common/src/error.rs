//! Error types shared across the Modwatch workspace.

use thiserror::Error;

/// Result type alias for Modwatch operations.
pub type Result<T> = std::result::Result<T, ModwatchError>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum ModwatchError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API error.
    #[error("Discord API error: {0}")]
    Discord(String),

    /// Logging bootstrap error.
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModwatchError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Discord error.
    pub fn discord(message: impl Into<String>) -> Self {
        Self::Discord(message.into())
    }
}

//! Error types for the tracker using thiserror.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors raised by persistence and task lifecycle.
///
/// Mutation port calls never return these; they only surface from startup,
/// persistence backends, and shutdown.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The state file could not be read or written.
    #[error("Failed to access state file {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but does not hold a valid snapshot.
    #[error("State file {path} is corrupt: {source}")]
    CorruptSnapshot {
        /// File that failed to parse.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A snapshot could not be encoded.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// A background task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A background task did not stop within the shutdown timeout.
    #[error("Timed out after {timeout:?} waiting for {task} to stop")]
    ShutdownTimeout {
        /// Name of the task.
        task: &'static str,
        /// Timeout that elapsed.
        timeout: Duration,
    },
}

//! Error types for process execution

use std::{io, time::Duration};
use thiserror::Error;

/// Process execution errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process
    #[error("Failed to spawn `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    /// I/O on the child's pipes failed
    #[error("Process I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Process timed out
    #[error("Process timed out after {limit:?}")]
    Timeout { limit: Duration },

    /// Failed to kill process
    #[error("Failed to kill process: {0}")]
    KillFailed(String),

    /// Invalid configuration
    #[error("Invalid process configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;

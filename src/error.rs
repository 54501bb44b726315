//! Error types for pushstate

use thiserror::Error;

/// Result type alias for pushstate operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// An error raised by the platform while executing a history operation.
///
/// Carries the platform's native error name (e.g. `SecurityError`) and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct PlatformError {
    pub name: String,
    pub message: String,
}

impl PlatformError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// pushstate error types
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A client-side error was reported and no listener cancelled it
    #[error("unhandled client error {name}: {message}")]
    UnhandledClientError { name: String, message: String },

    /// One or more replayed steps reported an error
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// A replay script line could not be parsed
    #[error("invalid script at line {line}: {reason}")]
    InvalidScript { line: usize, reason: String },

    /// Invalid command arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// `extend` was called while the extension was still attaching
    #[error("history extension is already attaching to a platform")]
    AttachInProgress,

    /// IO error
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl HistoryError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HistoryError::UnhandledClientError { .. } | HistoryError::CommandFailed(_) => 1,
            HistoryError::InvalidArguments(_) => 64,   // EX_USAGE
            HistoryError::AttachInProgress => 70,      // EX_SOFTWARE
            HistoryError::InvalidScript { .. } => 65,  // EX_DATAERR
            HistoryError::IoError(_) => 74,            // EX_IOERR
            HistoryError::SerializationError(_) => 65, // EX_DATAERR
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

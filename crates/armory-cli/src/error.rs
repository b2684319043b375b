//! Error types for armory-cli

use std::path::Path;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from armory-core
    #[error(transparent)]
    Core(#[from] armory_core::Error),

    /// Error from armory-fs
    #[error(transparent)]
    Fs(#[from] armory_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    #[allow(dead_code)]
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// A captured script log to dump alongside the error, if any.
    pub fn log_path(&self) -> Option<&Path> {
        match self {
            Self::Core(e) => e.log_path(),
            _ => None,
        }
    }
}

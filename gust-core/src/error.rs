//! Unified error type definition

use std::path::PathBuf;

use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// No west workspace above the start directory
    #[error("No west workspace found from {0}")]
    WorkspaceNotFound(PathBuf),

    /// Malformed or unreadable configuration
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A command ran but did not produce usable output
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the error comes from user environment rather than a bug.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::WorkspaceNotFound(_) | Self::CommandFailed(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

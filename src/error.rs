//! Error types for the content store and its index.

use crate::tree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the content store, the path sandbox and index persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested URL path normalizes to a location outside the content root.
    #[error("Cannot access files outside root: {0}")]
    PathEscapesRoot(String),

    /// The resolved path starts with a forbidden prefix.
    #[error("Forbidden path: {0}")]
    ForbiddenPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The persisted index artifact could not be parsed into a navigation tree.
    #[error("Malformed index {path}: {reason}")]
    MalformedIndex { path: PathBuf, reason: String },

    /// An index mutation would break the tree invariants.
    #[error("Inconsistent index: {0}")]
    Index(#[from] TreeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or logging setup failure.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::MalformedIndex {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(err: config::ConfigError) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<walkdir::Error> for StoreError {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => StoreError::Io(io),
            None => StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "filesystem loop detected while scanning",
            )),
        }
    }
}

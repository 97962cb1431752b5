//! Error types for the support desk backend.

use std::io;
use thiserror::Error;

use crate::ids::IdPrefix;

/// Result type for support desk operations.
pub type Result<T> = std::result::Result<T, DeskError>;

/// Errors surfaced by the mock backend.
///
/// Lookup misses are not errors: they come back as `None` or an empty
/// sequence. Only the authenticator fails in normal operation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeskError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("No free {prefix} id after {attempts} attempts")]
    IdSpaceExhausted { prefix: IdPrefix, attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for DeskError {
    fn from(err: tokio::task::JoinError) -> Self {
        DeskError::Internal(err.to_string())
    }
}

impl DeskError {
    /// Check if this error means the session is not valid.
    #[inline]
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, DeskError::Authentication(_))
    }

    /// Check if this error came from an aborted delay.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeskError::Cancelled)
    }
}

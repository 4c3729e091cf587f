//! Tally store error types.

use shared_types::NameError;
use thiserror::Error;

/// Failures reported by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded.
    #[error("corrupt entry `{key}`: {reason}")]
    Corrupt { key: String, reason: String },

    /// Underlying I/O failure.
    #[error("store I/O error: {0}")]
    Io(String),
}

/// Failures of [`crate::TallyService::record_vote`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! # Error Types
//!
//! Defines validation errors shared by the ingestion endpoint and the
//! queue consumer.

use thiserror::Error;

/// A name token could not be turned into a [`crate::TallyName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The token is empty or only whitespace.
    #[error("name is empty")]
    Empty,

    /// The normalized token exceeds the maximum length.
    #[error("name is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },
}

/// An access code token was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The code is empty.
    #[error("access code is empty")]
    Empty,
}

/// A vote batch did not have the `{"names": [string, ...]}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(String),

    /// The payload is not a JSON object.
    #[error("payload is not an object")]
    NotAnObject,

    /// The `names` field is absent.
    #[error("missing `names` field")]
    MissingNames,

    /// The `names` field is not an array.
    #[error("`names` is not a sequence")]
    NotASequence,

    /// An element of `names` is not a string.
    #[error("`names[{index}]` is not a string")]
    NotAString { index: usize },

    /// An element of `names` failed normalization.
    #[error("`names[{index}]`: {source}")]
    InvalidName {
        index: usize,
        #[source]
        source: NameError,
    },
}

//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Tally**: [`TallyName`], [`TallyRecord`]
//! - **Access**: [`AccessCode`]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CodeError, NameError};

/// Maximum length of a normalized name, in bytes.
pub const MAX_NAME_LEN: usize = 256;

// =============================================================================
// CLUSTER A: TALLY
// =============================================================================

/// A normalized, case-insensitive tally key.
///
/// The only constructor is [`TallyName::parse`], which lowercases the raw
/// token. Parsing an already normalized name yields the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TallyName(String);

impl TallyName {
    /// Normalize a raw name token.
    ///
    /// # Errors
    ///
    /// - [`NameError::Empty`] if the token is empty or whitespace-only
    /// - [`NameError::TooLong`] if the lowercased token exceeds [`MAX_NAME_LEN`]
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        if raw.trim().is_empty() {
            return Err(NameError::Empty);
        }

        let normalized = raw.to_lowercase();
        if normalized.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len: normalized.len(),
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(normalized))
    }

    /// The normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TallyName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TallyName> for String {
    fn from(name: TallyName) -> Self {
        name.0
    }
}

impl AsRef<str> for TallyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TallyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored tally: one normalized name and its vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRecord {
    /// Normalized name.
    pub name: TallyName,
    /// Number of accepted votes. Starts at 1.
    pub count: u64,
}

impl TallyRecord {
    /// A freshly created record with its first vote.
    #[must_use]
    pub fn first_vote(name: TallyName) -> Self {
        Self { name, count: 1 }
    }
}

// =============================================================================
// CLUSTER B: ACCESS
// =============================================================================

/// A one-time access code. Opaque: no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode(String);

impl AccessCode {
    /// Validate a raw code token. Any non-empty token is accepted as is.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        if raw.is_empty() {
            return Err(CodeError::Empty);
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccessCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccessCode> for String {
    fn from(code: AccessCode) -> Self {
        code.0
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

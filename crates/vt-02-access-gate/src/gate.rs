//! The access-code gate.

use std::sync::Arc;

use shared_types::AccessCode;
use tracing::{debug, warn};
use vt_01_tally_store::{AccessCodeStore, StoreError};

/// Outcome of presenting a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeVerdict {
    /// First presentation; the code is now consumed.
    Valid,
    /// Already consumed, empty, or malformed.
    Invalid,
}

impl CodeVerdict {
    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Checks and consumes one-time access codes.
#[derive(Clone)]
pub struct AccessGate {
    store: Arc<dyn AccessCodeStore>,
}

impl AccessGate {
    pub fn new(store: Arc<dyn AccessCodeStore>) -> Self {
        Self { store }
    }

    /// Present a code.
    ///
    /// A token that does not parse as an [`AccessCode`] is `Invalid` and
    /// never reaches the store.
    ///
    /// # Errors
    ///
    /// Only infrastructure failures; a reused code is a normal `Invalid`.
    pub async fn consume(&self, raw: &str) -> Result<CodeVerdict, StoreError> {
        let code = match AccessCode::parse(raw) {
            Ok(code) => code,
            Err(e) => {
                debug!(error = %e, "Access code rejected before lookup");
                return Ok(CodeVerdict::Invalid);
            }
        };

        if self.store.insert_if_absent(&code).await? {
            debug!("Access code accepted");
            Ok(CodeVerdict::Valid)
        } else {
            warn!("Access code reused");
            Ok(CodeVerdict::Invalid)
        }
    }

    /// Whether the code had already been seen.
    ///
    /// An unseen code is recorded as a side effect, so asking twice
    /// answers `false` then `true`. A malformed token answers `false` and
    /// records nothing.
    pub async fn code_exists(&self, raw: &str) -> Result<bool, StoreError> {
        match self.consume(raw).await? {
            CodeVerdict::Valid => Ok(false),
            CodeVerdict::Invalid => Ok(AccessCode::parse(raw).is_ok()),
        }
    }

    /// Read-only membership check.
    pub async fn is_consumed(&self, raw: &str) -> Result<bool, StoreError> {
        match AccessCode::parse(raw) {
            Ok(code) => self.store.contains(&code).await,
            Err(_) => Ok(false),
        }
    }
}

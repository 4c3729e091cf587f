//! # `VoteBatch` Envelope
//!
//! The `{"names": [...]}` payload accepted by the ingestion endpoint and
//! carried through the work queue.
//!
//! Raw names are kept verbatim in the envelope; normalization happens when
//! the batch is turned into [`TallyName`]s with [`VoteBatch::normalized`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::TallyName;
use crate::errors::BatchError;

/// A batch of raw name tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBatch {
    pub names: Vec<String>,
}

impl VoteBatch {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Shape-check an already parsed JSON value.
    ///
    /// Unlike a derived `Deserialize`, this reports *which* rule failed so
    /// callers can log a precise reason.
    pub fn from_value(value: &Value) -> Result<Self, BatchError> {
        let object = value.as_object().ok_or(BatchError::NotAnObject)?;
        let names = object.get("names").ok_or(BatchError::MissingNames)?;
        let items = names.as_array().ok_or(BatchError::NotASequence)?;

        let names = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(BatchError::NotAString { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { names })
    }

    /// Parse and shape-check raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BatchError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| BatchError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Normalize every name, failing on the first invalid one.
    ///
    /// Nothing is returned unless the whole batch is valid.
    pub fn normalized(&self) -> Result<Vec<TallyName>, BatchError> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                TallyName::parse(raw).map_err(|source| BatchError::InvalidName { index, source })
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

//! Outbound (Driven) ports for the tally store.
//!
//! These traits define the storage the tally subsystem depends on. Adapters
//! live in `crate::adapters`.

use async_trait::async_trait;
use shared_types::{AccessCode, TallyName, TallyRecord};

use crate::domain::errors::StoreError;

/// Tally collection keyed by normalized name.
#[async_trait]
pub trait TallyStore: Send + Sync {
    /// Insert `count = 1` if the name is absent, otherwise add 1, as one
    /// atomic step.
    ///
    /// # Returns
    ///
    /// The count after the increment.
    async fn upsert_increment(&self, name: &TallyName) -> Result<u64, StoreError>;

    /// Fetch a single record.
    async fn find(&self, name: &TallyName) -> Result<Option<TallyRecord>, StoreError>;

    /// Insert or overwrite a record.
    async fn save(&self, record: &TallyRecord) -> Result<(), StoreError>;

    /// Every record, in no particular order.
    async fn all(&self) -> Result<Vec<TallyRecord>, StoreError>;
}

/// Collection of consumed access codes.
#[async_trait]
pub trait AccessCodeStore: Send + Sync {
    /// Insert the code unless it is already present, as one atomic step.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the code was unseen and is now recorded
    /// - `Ok(false)`: the code was already recorded; nothing changed
    async fn insert_if_absent(&self, code: &AccessCode) -> Result<bool, StoreError>;

    /// Whether the code has been recorded. Read-only.
    async fn contains(&self, code: &AccessCode) -> Result<bool, StoreError>;
}

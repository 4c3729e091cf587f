//! In-memory store adapters.
//!
//! Both maps are sharded `DashMap`s; entry-level operations hold the shard
//! lock for the whole check-and-write, which is what makes
//! `upsert_increment` and `insert_if_absent` atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{AccessCode, TallyName, TallyRecord};

use crate::domain::errors::StoreError;
use crate::ports::outbound::{AccessCodeStore, TallyStore};

/// Tally collection held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTallyStore {
    tallies: DashMap<TallyName, u64>,
}

impl InMemoryTallyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }
}

#[async_trait]
impl TallyStore for InMemoryTallyStore {
    async fn upsert_increment(&self, name: &TallyName) -> Result<u64, StoreError> {
        let count = *self
            .tallies
            .entry(name.clone())
            .and_modify(|count| *count = count.saturating_add(1))
            .or_insert(1);
        Ok(count)
    }

    async fn find(&self, name: &TallyName) -> Result<Option<TallyRecord>, StoreError> {
        Ok(self.tallies.get(name).map(|entry| TallyRecord {
            name: entry.key().clone(),
            count: *entry.value(),
        }))
    }

    async fn save(&self, record: &TallyRecord) -> Result<(), StoreError> {
        self.tallies.insert(record.name.clone(), record.count);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<TallyRecord>, StoreError> {
        Ok(self
            .tallies
            .iter()
            .map(|entry| TallyRecord {
                name: entry.key().clone(),
                count: *entry.value(),
            })
            .collect())
    }
}

/// Consumed access codes held in process memory, with first-seen time.
#[derive(Debug, Default)]
pub struct InMemoryAccessCodeStore {
    codes: DashMap<AccessCode, DateTime<Utc>>,
}

impl InMemoryAccessCodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[async_trait]
impl AccessCodeStore for InMemoryAccessCodeStore {
    async fn insert_if_absent(&self, code: &AccessCode) -> Result<bool, StoreError> {
        match self.codes.entry(code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(true)
            }
        }
    }

    async fn contains(&self, code: &AccessCode) -> Result<bool, StoreError> {
        Ok(self.codes.contains_key(code))
    }
}

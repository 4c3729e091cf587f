//! Tally service: the single entry into the increment operation.

use std::sync::Arc;

use shared_types::{TallyName, TallyRecord};
use tracing::{debug, info};

use crate::domain::errors::{StoreError, TallyError};
use crate::domain::strategy::IncrementStrategy;
use crate::ports::outbound::TallyStore;

/// Applies votes to a [`TallyStore`] using the configured strategy.
#[derive(Clone)]
pub struct TallyService {
    store: Arc<dyn TallyStore>,
    strategy: IncrementStrategy,
}

impl TallyService {
    /// Service using [`IncrementStrategy::AtomicUpsert`].
    pub fn new(store: Arc<dyn TallyStore>) -> Self {
        Self::with_strategy(store, IncrementStrategy::default())
    }

    pub fn with_strategy(store: Arc<dyn TallyStore>, strategy: IncrementStrategy) -> Self {
        Self { store, strategy }
    }

    pub fn strategy(&self) -> IncrementStrategy {
        self.strategy
    }

    pub fn store(&self) -> &Arc<dyn TallyStore> {
        &self.store
    }

    /// Normalize a raw name and count one vote for it.
    pub async fn record_vote(&self, raw: &str) -> Result<TallyRecord, TallyError> {
        let name = TallyName::parse(raw)?;
        Ok(self.increment(&name).await?)
    }

    /// Count one vote for an already normalized name.
    pub async fn increment(&self, name: &TallyName) -> Result<TallyRecord, StoreError> {
        let record = match self.strategy {
            IncrementStrategy::AtomicUpsert => TallyRecord {
                name: name.clone(),
                count: self.store.upsert_increment(name).await?,
            },
            IncrementStrategy::ReadModifyWrite => {
                let record = match self.store.find(name).await? {
                    Some(mut existing) => {
                        existing.count = existing.count.saturating_add(1);
                        existing
                    }
                    None => TallyRecord::first_vote(name.clone()),
                };
                self.store.save(&record).await?;
                record
            }
        };

        if record.count == 1 {
            info!(name = %record.name, "New tally created");
        } else {
            debug!(name = %record.name, count = record.count, "Tally incremented");
        }
        Ok(record)
    }

    /// Count one vote per element, in order.
    ///
    /// Stops at the first store failure; earlier increments stay applied.
    ///
    /// # Returns
    ///
    /// Number of votes applied.
    pub async fn record_batch(&self, names: &[TallyName]) -> Result<usize, StoreError> {
        for name in names {
            self.increment(name).await?;
        }
        Ok(names.len())
    }
}

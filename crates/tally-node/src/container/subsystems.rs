//! # Service Container
//!
//! Holds every subsystem instance. Built once from [`NodeConfig`].
//!
//! ## Wiring
//!
//! ```text
//! stores ─→ TallyService ─→ VoteConsumer (queued mode)
//!        ─→ AccessGate
//!        ─→ TallyReporter ─→ TallyBroadcaster
//! queue  ─→ VotePublisher (queued mode)
//! ```
//!
//! With the `rocksdb` feature and a data directory, one [`RocksDbStore`]
//! backs both store ports.

use std::sync::Arc;

use shared_bus::InMemoryWorkQueue;
use tracing::{info, warn};
use vt_01_tally_store::{
    AccessCodeStore, InMemoryAccessCodeStore, InMemoryTallyStore, StoreError, TallyService,
    TallyStore,
};
#[cfg(feature = "rocksdb")]
use vt_01_tally_store::{RocksDbConfig, RocksDbStore};
use vt_02_access_gate::AccessGate;
use vt_03_queue_relay::{VoteConsumer, VotePublisher};
use vt_04_tally_reporter::{TallyBroadcaster, TallyReporter};
use vt_05_api_gateway::{AppState, Ingest, IngestMode};

use crate::container::config::NodeConfig;

/// Central container holding all subsystem instances.
pub struct ServiceContainer {
    pub config: NodeConfig,
    pub tally: TallyService,
    pub gate: AccessGate,
    pub reporter: TallyReporter,
    pub broadcaster: TallyBroadcaster,
    /// Present in queued mode only.
    pub queue: Option<InMemoryWorkQueue>,
    tallies: Arc<dyn TallyStore>,
}

impl ServiceContainer {
    /// Build every subsystem.
    ///
    /// # Errors
    ///
    /// The persistent store could not be opened.
    pub fn new(config: NodeConfig) -> Result<Self, StoreError> {
        let (tallies, codes) = open_stores(&config)?;

        if !config.strategy.is_race_free() {
            warn!(
                strategy = %config.strategy,
                "Increment strategy can lose concurrent votes for the same name"
            );
        }
        let tally = TallyService::with_strategy(Arc::clone(&tallies), config.strategy);
        let gate = AccessGate::new(codes);
        let reporter = TallyReporter::new(Arc::clone(&tallies));
        let broadcaster = TallyBroadcaster::new(reporter.clone(), config.push_interval);

        let queue = match config.ingest {
            IngestMode::Direct => None,
            IngestMode::Queued => Some(InMemoryWorkQueue::with_capacity(
                config.queue.name.clone(),
                config.queue.capacity,
            )),
        };

        info!(
            strategy = %config.strategy,
            ingest = %config.ingest,
            persistent = config.data_dir.is_some(),
            "Subsystems initialized"
        );

        Ok(Self {
            config,
            tally,
            gate,
            reporter,
            broadcaster,
            queue,
            tallies,
        })
    }

    pub fn tally_store(&self) -> &Arc<dyn TallyStore> {
        &self.tallies
    }

    /// Consumer applying queued batches, in queued mode.
    pub fn vote_consumer(&self) -> Option<VoteConsumer> {
        self.queue
            .as_ref()
            .map(|_| VoteConsumer::new(self.tally.clone()))
    }

    /// Handler state for the gateway.
    pub fn app_state(&self) -> AppState {
        let ingest = match &self.queue {
            None => Ingest::Direct,
            Some(queue) => Ingest::Queued(VotePublisher::with_retry(
                Arc::new(queue.clone()),
                self.config.retry_policy(),
            )),
        };

        AppState {
            tally: self.tally.clone(),
            reporter: self.reporter.clone(),
            broadcaster: self.broadcaster.clone(),
            gate: self.gate.clone(),
            ingest,
            require_code: self.config.require_code,
        }
    }
}

type Stores = (Arc<dyn TallyStore>, Arc<dyn AccessCodeStore>);

#[cfg(feature = "rocksdb")]
fn open_stores(config: &NodeConfig) -> Result<Stores, StoreError> {
    match &config.data_dir {
        Some(dir) => {
            let store = Arc::new(RocksDbStore::open(RocksDbConfig {
                path: dir.to_string_lossy().to_string(),
                ..RocksDbConfig::default()
            })?);
            let tallies: Arc<dyn TallyStore> = store.clone();
            let codes: Arc<dyn AccessCodeStore> = store;
            Ok((tallies, codes))
        }
        None => Ok(in_memory()),
    }
}

#[cfg(not(feature = "rocksdb"))]
fn open_stores(config: &NodeConfig) -> Result<Stores, StoreError> {
    if config.data_dir.is_some() {
        return Err(StoreError::Unavailable(
            "persistent storage requires the `rocksdb` feature".into(),
        ));
    }
    Ok(in_memory())
}

fn in_memory() -> Stores {
    (
        Arc::new(InMemoryTallyStore::new()),
        Arc::new(InMemoryAccessCodeStore::new()),
    )
}

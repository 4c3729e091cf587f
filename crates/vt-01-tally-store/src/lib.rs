//! # Tally Store (vt-01)
//!
//! The authoritative persistence layer for vote tallies and consumed access
//! codes, plus the increment operation every vote goes through.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Exact Counting | Stored count for a name equals the number of accepted votes for it |
//! | 2 | Normalized Keys | Every key is a [`TallyName`], so case variants share one record |
//! | 3 | First Vote Creates | A missing record is created with count 1 |
//! | 4 | One-Time Codes | A code can be inserted at most once |
//!
//! Invariants 1 and 4 only hold under concurrency with the atomic
//! operations: [`TallyStore::upsert_increment`] and
//! [`AccessCodeStore::insert_if_absent`].
//!
//! ## Increment Strategies
//!
//! | Strategy | Store calls | Concurrency |
//! |----------|-------------|-------------|
//! | [`IncrementStrategy::AtomicUpsert`] | one `upsert_increment` | race-free (default) |
//! | [`IncrementStrategy::ReadModifyWrite`] | `find` then `save` | loses updates under contention |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Strategy selection and errors
//! - `ports/` - Outbound store traits
//! - `adapters/` - In-memory and RocksDB implementations
//! - `service.rs` - [`TallyService`], the single entry into the increment operation
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vt_01_tally_store::{InMemoryTallyStore, TallyService};
//!
//! let service = TallyService::new(Arc::new(InMemoryTallyStore::new()));
//! let record = service.record_vote("Alice").await?;
//! assert_eq!(record.count, 1);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::memory::{InMemoryAccessCodeStore, InMemoryTallyStore};
#[cfg(feature = "rocksdb")]
pub use adapters::rocksdb::{RocksDbConfig, RocksDbStore};
pub use domain::errors::{StoreError, TallyError};
pub use domain::strategy::IncrementStrategy;
pub use ports::outbound::{AccessCodeStore, TallyStore};
pub use service::TallyService;

pub use shared_types::{AccessCode, TallyName, TallyRecord};

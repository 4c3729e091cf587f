//! Store adapters.
//!
//! - `memory` - concurrent maps, for tests and single-process deployments
//! - `rocksdb` - persistent column families (feature `rocksdb`)

pub mod memory;

#[cfg(feature = "rocksdb")]
pub mod rocksdb;

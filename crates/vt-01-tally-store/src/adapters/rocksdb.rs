//! # RocksDB Store Adapter
//!
//! Persistent implementation of both store ports.
//!
//! ## Column Families
//!
//! - `tallies` - normalized name → count (u64, big-endian)
//! - `access_codes` - code → first-seen unix millis (i64, big-endian)
//!
//! ## Atomicity
//!
//! RocksDB has no native increment, so every read-then-write runs under the
//! write half of the store's lock. Plain reads take the read half.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use shared_types::{AccessCode, TallyName, TallyRecord};
use std::path::Path;
use tracing::info;

use crate::domain::errors::StoreError;
use crate::ports::outbound::{AccessCodeStore, TallyStore};

pub const CF_TALLIES: &str = "tallies";
pub const CF_ACCESS_CODES: &str = "access_codes";

/// All column families used by the store
pub const COLUMN_FAMILIES: &[&str] = &[CF_TALLIES, CF_ACCESS_CODES];

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each write (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/tally".to_string(),
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Small buffers, no fsync.
    pub fn for_testing(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed tally and access-code store.
pub struct RocksDbStore {
    db: RwLock<DB>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| StoreError::Unavailable(format!("failed to open RocksDB: {e}")))?;

        info!(path = %config.path, "Tally store opened");
        Ok(Self {
            db: RwLock::new(db),
            config,
        })
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    fn write_opts(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

fn cf<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily, StoreError> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::Unavailable(format!("column family `{name}` missing")))
}

fn io(e: rocksdb::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

fn decode_count(key: &str, bytes: &[u8]) -> Result<u64, StoreError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| StoreError::Corrupt {
        key: key.to_string(),
        reason: format!("expected 8 bytes, found {}", bytes.len()),
    })?;
    Ok(u64::from_be_bytes(raw))
}

fn decode_name(bytes: &[u8]) -> Result<TallyName, StoreError> {
    let key = String::from_utf8_lossy(bytes);
    let raw = std::str::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    TallyName::parse(raw).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl TallyStore for RocksDbStore {
    async fn upsert_increment(&self, name: &TallyName) -> Result<u64, StoreError> {
        let db = self.db.write();
        let cf = cf(&db, CF_TALLIES)?;
        let key = name.as_str().as_bytes();

        let current = match db.get_cf(cf, key).map_err(io)? {
            Some(bytes) => decode_count(name.as_str(), &bytes)?,
            None => 0,
        };
        let next = current.saturating_add(1);
        db.put_cf_opt(cf, key, next.to_be_bytes(), &self.write_opts())
            .map_err(io)?;
        Ok(next)
    }

    async fn find(&self, name: &TallyName) -> Result<Option<TallyRecord>, StoreError> {
        let db = self.db.read();
        let cf = cf(&db, CF_TALLIES)?;
        match db.get_cf(cf, name.as_str().as_bytes()).map_err(io)? {
            Some(bytes) => Ok(Some(TallyRecord {
                name: name.clone(),
                count: decode_count(name.as_str(), &bytes)?,
            })),
            None => Ok(None),
        }
    }

    async fn save(&self, record: &TallyRecord) -> Result<(), StoreError> {
        let db = self.db.read();
        let cf = cf(&db, CF_TALLIES)?;
        db.put_cf_opt(
            cf,
            record.name.as_str().as_bytes(),
            record.count.to_be_bytes(),
            &self.write_opts(),
        )
        .map_err(io)
    }

    async fn all(&self) -> Result<Vec<TallyRecord>, StoreError> {
        let db = self.db.read();
        let cf = cf(&db, CF_TALLIES)?;
        let mut records = Vec::new();
        for item in db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item.map_err(io)?;
            let name = decode_name(&key)?;
            let count = decode_count(name.as_str(), &value)?;
            records.push(TallyRecord { name, count });
        }
        Ok(records)
    }
}

#[async_trait]
impl AccessCodeStore for RocksDbStore {
    async fn insert_if_absent(&self, code: &AccessCode) -> Result<bool, StoreError> {
        let db = self.db.write();
        let cf = cf(&db, CF_ACCESS_CODES)?;
        let key = code.as_str().as_bytes();

        if db.get_cf(cf, key).map_err(io)?.is_some() {
            return Ok(false);
        }
        db.put_cf_opt(
            cf,
            key,
            Utc::now().timestamp_millis().to_be_bytes(),
            &self.write_opts(),
        )
        .map_err(io)?;
        Ok(true)
    }

    async fn contains(&self, code: &AccessCode) -> Result<bool, StoreError> {
        let db = self.db.read();
        let cf = cf(&db, CF_ACCESS_CODES)?;
        Ok(db.get_cf(cf, code.as_str().as_bytes()).map_err(io)?.is_some())
    }
}

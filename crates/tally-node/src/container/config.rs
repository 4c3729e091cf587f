//! # Node Configuration
//!
//! Runtime parameters for every subsystem, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TALLY_HOST` | `0.0.0.0` | bind address |
//! | `TALLY_PORT` / `PORT` | `3000` | listening port |
//! | `TALLY_INGEST_MODE` | `direct` | `direct` or `queued` |
//! | `TALLY_REQUIRE_CODE` | `false` | require a one-time code on `POST /vote` |
//! | `TALLY_STRATEGY` | `atomic` | `atomic` or `read-modify-write` |
//! | `TALLY_DATA_DIR` | unset | RocksDB path (feature `rocksdb`) |
//! | `TALLY_QUEUE_NAME` | `votes` | work queue name |
//! | `TALLY_QUEUE_CAPACITY` | `1000` | queue bound |
//! | `TALLY_PUBLISH_ATTEMPTS` | `3` | publish attempts per batch |
//! | `TALLY_PUSH_INTERVAL_MS` | `500` | push ticker period |
//! | `TALLY_MAX_BODY_BYTES` | `65536` | request body limit |
//! | `TALLY_CORS_ORIGINS` | `*` | comma-separated allowed origins |

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared_bus::{DEFAULT_QUEUE_CAPACITY, DEFAULT_QUEUE_NAME};
use thiserror::Error;
use vt_01_tally_store::IncrementStrategy;
use vt_03_queue_relay::RetryPolicy;
use vt_04_tally_reporter::DEFAULT_PUSH_INTERVAL;
use vt_05_api_gateway::{CorsConfig, GatewayConfig, HttpConfig, IngestMode};

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// HTTP bind address.
    pub host: IpAddr,
    /// HTTP port.
    pub port: u16,
    /// Direct or queued ingestion.
    pub ingest: IngestMode,
    /// Whether `POST /vote` needs a one-time code.
    pub require_code: bool,
    /// How votes are applied to the store.
    pub strategy: IncrementStrategy,
    /// Persistent store directory. In-memory stores when `None`.
    pub data_dir: Option<PathBuf>,
    /// Queue settings.
    pub queue: QueueConfig,
    /// Push ticker period.
    pub push_interval: Duration,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
}

/// Work queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub name: String,
    pub capacity: usize,
    pub publish_attempts: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            capacity: DEFAULT_QUEUE_CAPACITY,
            publish_attempts: RetryPolicy::default().max_attempts,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            ingest: IngestMode::Direct,
            require_code: false,
            strategy: IncrementStrategy::AtomicUpsert,
            data_dir: None,
            queue: QueueConfig::default(),
            push_interval: DEFAULT_PUSH_INTERVAL,
            max_body_bytes: 64 * 1024,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl NodeConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("TALLY_HOST") {
            config.host = parse("TALLY_HOST", &host)?;
        }
        if let Some(port) = lookup("TALLY_PORT") {
            config.port = parse("TALLY_PORT", &port)?;
        } else if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(mode) = lookup("TALLY_INGEST_MODE") {
            config.ingest = mode.parse::<IngestMode>().map_err(|e| ConfigError::InvalidValue {
                var: "TALLY_INGEST_MODE",
                value: mode.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(flag) = lookup("TALLY_REQUIRE_CODE") {
            config.require_code = parse_flag("TALLY_REQUIRE_CODE", &flag)?;
        }
        if let Some(strategy) = lookup("TALLY_STRATEGY") {
            config.strategy =
                strategy
                    .parse::<IncrementStrategy>()
                    .map_err(|reason| ConfigError::InvalidValue {
                        var: "TALLY_STRATEGY",
                        value: strategy.clone(),
                        reason,
                    })?;
        }
        if let Some(dir) = lookup("TALLY_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = lookup("TALLY_QUEUE_NAME") {
            config.queue.name = name;
        }
        if let Some(capacity) = lookup("TALLY_QUEUE_CAPACITY") {
            config.queue.capacity = parse("TALLY_QUEUE_CAPACITY", &capacity)?;
        }
        if let Some(attempts) = lookup("TALLY_PUBLISH_ATTEMPTS") {
            config.queue.publish_attempts = parse("TALLY_PUBLISH_ATTEMPTS", &attempts)?;
        }
        if let Some(ms) = lookup("TALLY_PUSH_INTERVAL_MS") {
            config.push_interval = Duration::from_millis(parse("TALLY_PUSH_INTERVAL_MS", &ms)?);
        }
        if let Some(bytes) = lookup("TALLY_MAX_BODY_BYTES") {
            config.max_body_bytes = parse("TALLY_MAX_BODY_BYTES", &bytes)?;
        }
        if let Some(origins) = lookup("TALLY_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }

    /// Reject settings the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.push_interval.is_zero() {
            return Err(ConfigError::Invalid("push interval must be positive".into()));
        }
        if self.queue.capacity == 0 {
            return Err(ConfigError::Invalid("queue capacity must be positive".into()));
        }
        if self.queue.publish_attempts == 0 {
            return Err(ConfigError::Invalid("publish attempts must be at least 1".into()));
        }
        if self.queue.name.trim().is_empty() {
            return Err(ConfigError::Invalid("queue name must not be empty".into()));
        }
        if self.data_dir.is_some() && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::Invalid(
                "TALLY_DATA_DIR requires the `rocksdb` feature".into(),
            ));
        }
        self.gateway().validate()?;
        Ok(())
    }

    /// Gateway view of this configuration.
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            http: HttpConfig {
                host: self.host,
                port: self.port,
                max_body_bytes: self.max_body_bytes,
            },
            cors: CorsConfig {
                allowed_origins: self.cors_origins.clone(),
                ..CorsConfig::default()
            },
            ingest: self.ingest,
            require_code: self.require_code,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_attempts(self.queue.publish_attempts)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable did not parse.
    #[error("{var}={value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The combination of settings is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Gateway(#[from] vt_05_api_gateway::ConfigError),
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false".into(),
        }),
    }
}

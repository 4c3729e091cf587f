//! # Tally Telemetry
//!
//! Logging and metrics for the tally node.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an env filter, human or JSON output
//! - **Metrics**: Prometheus counters and gauges in a process-wide registry,
//!   rendered by [`encode_metrics`] for `GET /metrics`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     tracing::info!("node starting");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TALLY_LOG_LEVEL` | `info` | Log filter directive (falls back to `RUST_LOG`) |
//! | `TALLY_JSON_LOGS` | `false` | One JSON object per line |
//! | `TALLY_SERVICE_NAME` | `vote-tally` | Service name attached to the startup log |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, ACCESS_CODES, BATCHES_PUBLISHED, HTTP_DURATION, HTTP_REQUESTS,
    PUBLISH_RETRIES, PUSH_SUBSCRIBERS, PUSH_TICKS, QUEUE_MESSAGES, VOTES_RECORDED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

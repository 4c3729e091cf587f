//! Prometheus metrics for the tally node.
//!
//! All metrics follow the naming convention: `tally_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., votes_recorded_total)
//! - **Gauge**: Value that can go up or down (e.g., push_subscribers)
//! - **Histogram**: Distribution of values (e.g., http_request_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TALLY METRICS
    // =========================================================================

    /// Votes applied to the store
    pub static ref VOTES_RECORDED: CounterVec = CounterVec::new(
        Opts::new("tally_votes_recorded_total", "Votes applied to the tally store"),
        &["path"]  // path: direct/queued
    ).expect("metric creation failed");

    // =========================================================================
    // QUEUE METRICS
    // =========================================================================

    /// Batches handed to the work queue
    pub static ref BATCHES_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new("tally_queue_batches_published_total", "Vote batches published to the work queue"),
        &["outcome"]  // outcome: ok/failed
    ).expect("metric creation failed");

    /// Publish attempts beyond the first
    pub static ref PUBLISH_RETRIES: Counter = Counter::new(
        "tally_queue_publish_retries_total",
        "Publish attempts retried after a queue failure"
    ).expect("metric creation failed");

    /// Messages settled by the consumer
    pub static ref QUEUE_MESSAGES: CounterVec = CounterVec::new(
        Opts::new("tally_queue_messages_total", "Queue messages settled by the consumer"),
        &["outcome"]  // outcome: processed/dead_lettered/store_failed
    ).expect("metric creation failed");

    // =========================================================================
    // ACCESS GATE METRICS
    // =========================================================================

    /// Access code presentations
    pub static ref ACCESS_CODES: CounterVec = CounterVec::new(
        Opts::new("tally_access_codes_total", "Access code presentations by verdict"),
        &["verdict"]  // verdict: valid/invalid
    ).expect("metric creation failed");

    // =========================================================================
    // PUSH METRICS
    // =========================================================================

    /// Live push subscriptions
    pub static ref PUSH_SUBSCRIBERS: Gauge = Gauge::new(
        "tally_push_subscribers",
        "Number of live push subscriptions"
    ).expect("metric creation failed");

    /// Push ticker iterations
    pub static ref PUSH_TICKS: CounterVec = CounterVec::new(
        Opts::new("tally_push_ticks_total", "Push ticker iterations"),
        &["outcome"]  // outcome: broadcast/skipped/failed
    ).expect("metric creation failed");

    // =========================================================================
    // HTTP METRICS
    // =========================================================================

    /// Requests served
    pub static ref HTTP_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("tally_http_requests_total", "HTTP requests by method, route and status"),
        &["method", "route", "status"]
    ).expect("metric creation failed");

    /// Request latency
    pub static ref HTTP_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "tally_http_request_duration_seconds",
            "Time spent serving HTTP requests"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("bucket layout")),
        &["route"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it again is harmless: collectors already registered are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(VOTES_RECORDED.clone()),
        // Queue
        Box::new(BATCHES_PUBLISHED.clone()),
        Box::new(PUBLISH_RETRIES.clone()),
        Box::new(QUEUE_MESSAGES.clone()),
        // Access gate
        Box::new(ACCESS_CODES.clone()),
        // Push
        Box::new(PUSH_SUBSCRIBERS.clone()),
        Box::new(PUSH_TICKS.clone()),
        // HTTP
        Box::new(HTTP_REQUESTS.clone()),
        Box::new(HTTP_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

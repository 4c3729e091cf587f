//! Publishing side of the relay.

use std::sync::Arc;

use shared_bus::{DeadLetter, PublishError, QueueStatsSnapshot, WorkQueue};
use shared_types::VoteBatch;
use tally_telemetry::{metric_inc, BATCHES_PUBLISHED, PUBLISH_RETRIES};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::retry::RetryPolicy;

/// Errors from handing a batch to the queue.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The batch could not be serialized.
    #[error("failed to encode vote batch: {0}")]
    Encode(#[from] serde_json::Error),

    /// Every publish attempt failed.
    #[error("publish to `{queue}` failed after {attempts} attempt(s)")]
    Publish {
        queue: String,
        attempts: u32,
        #[source]
        source: PublishError,
    },
}

/// Hands vote batches to the work queue.
#[derive(Clone)]
pub struct VotePublisher {
    queue: Arc<dyn WorkQueue>,
    retry: RetryPolicy,
}

impl VotePublisher {
    pub fn new(queue: Arc<dyn WorkQueue>) -> Self {
        Self::with_retry(queue, RetryPolicy::default())
    }

    pub fn with_retry(queue: Arc<dyn WorkQueue>, retry: RetryPolicy) -> Self {
        Self { queue, retry }
    }

    pub fn queue_name(&self) -> &str {
        self.queue.name()
    }

    pub fn queue_stats(&self) -> QueueStatsSnapshot {
        self.queue.stats()
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.queue.dead_letters()
    }

    /// Serialize and publish one batch.
    ///
    /// A full queue is retried with backoff; a closed queue fails at once.
    pub async fn publish(&self, batch: &VoteBatch) -> Result<Uuid, RelayError> {
        let payload = batch.to_bytes()?;
        let mut attempt = 1;

        loop {
            match self.queue.publish(payload.clone()).await {
                Ok(id) => {
                    metric_inc!(BATCHES_PUBLISHED, &["ok"]);
                    debug!(
                        queue = self.queue.name(),
                        message_id = %id,
                        names = batch.len(),
                        attempt,
                        "Vote batch published"
                    );
                    return Ok(id);
                }
                Err(e) if attempt < self.retry.max_attempts && is_transient(&e) => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        queue = self.queue.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Publish failed, retrying"
                    );
                    metric_inc!(PUBLISH_RETRIES);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    metric_inc!(BATCHES_PUBLISHED, &["failed"]);
                    error!(
                        queue = self.queue.name(),
                        attempt,
                        error = %e,
                        "Publish failed"
                    );
                    return Err(RelayError::Publish {
                        queue: self.queue.name().to_string(),
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
}

fn is_transient(error: &PublishError) -> bool {
    matches!(error, PublishError::Full { .. })
}

//! Consuming side of the relay.

use shared_bus::{Delivery, QueueConsumer};
use shared_types::VoteBatch;
use tally_telemetry::{metric_inc, QUEUE_MESSAGES, VOTES_RECORDED};
use tracing::{error, info, warn};
use vt_01_tally_store::TallyService;

/// How a single message was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Every name was counted.
    Processed { votes: usize },
    /// The payload was malformed; nothing was counted.
    DeadLettered,
    /// The store failed part way; the message was acknowledged anyway.
    StoreFailed,
}

/// The single consumer applying queued batches to the tally.
#[derive(Clone)]
pub struct VoteConsumer {
    service: TallyService,
}

impl VoteConsumer {
    pub fn new(service: TallyService) -> Self {
        Self { service }
    }

    /// Drain the queue until it is closed and empty.
    ///
    /// # Returns
    ///
    /// Number of messages settled.
    pub async fn run(&self, mut consumer: QueueConsumer) -> u64 {
        info!(queue = consumer.queue_name(), "Vote consumer started");
        let mut settled = 0u64;

        while let Some(delivery) = consumer.recv().await {
            self.handle(delivery).await;
            settled += 1;
        }

        info!(
            queue = consumer.queue_name(),
            settled, "Vote consumer stopped, queue drained"
        );
        settled
    }

    /// Process and settle one delivery.
    pub async fn handle(&self, delivery: Delivery) -> MessageOutcome {
        let message_id = delivery.message().id;

        let names = match VoteBatch::from_slice(delivery.payload()).and_then(|b| b.normalized()) {
            Ok(names) => names,
            Err(e) => {
                warn!(%message_id, error = %e, "Malformed vote batch discarded");
                delivery.dead_letter(e.to_string());
                metric_inc!(QUEUE_MESSAGES, &["dead_lettered"]);
                return MessageOutcome::DeadLettered;
            }
        };

        let outcome = match self.service.record_batch(&names).await {
            Ok(votes) => {
                VOTES_RECORDED
                    .with_label_values(&["queued"])
                    .inc_by(votes as f64);
                metric_inc!(QUEUE_MESSAGES, &["processed"]);
                MessageOutcome::Processed { votes }
            }
            Err(e) => {
                error!(%message_id, error = %e, "Failed to apply queued vote batch");
                metric_inc!(QUEUE_MESSAGES, &["store_failed"]);
                MessageOutcome::StoreFailed
            }
        };

        delivery.ack();
        outcome
    }
}

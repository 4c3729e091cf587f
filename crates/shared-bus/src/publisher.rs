//! # Work Queue Publisher
//!
//! Defines the publishing side of the work queue.

use crate::dead_letter::{DeadLetter, DeadLetterBuffer};
use crate::messages::{QueueMessage, QueueStats, QueueStatsSnapshot};
use crate::subscriber::{QueueConsumer, SubscriptionError};
use crate::{DEAD_LETTER_CAPACITY, DEFAULT_QUEUE_CAPACITY};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors from publishing to a queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The queue no longer accepts messages.
    #[error("queue `{queue}` is closed")]
    Closed { queue: String },

    /// The queue is at capacity.
    #[error("queue `{queue}` is full ({capacity} messages)")]
    Full { queue: String, capacity: usize },
}

/// Trait for publishing payloads to a work queue.
///
/// This is the interface the ingestion endpoint uses to hand a batch off
/// without waiting for it to be persisted.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Publish a payload.
    ///
    /// # Returns
    ///
    /// The id assigned to the message.
    async fn publish(&self, payload: Vec<u8>) -> Result<Uuid, PublishError>;

    /// Name of the queue.
    fn name(&self) -> &str;

    /// Lifetime delivery counters. Queues that keep none report zeros.
    fn stats(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot::default()
    }

    /// Retained dead letters, oldest first.
    fn dead_letters(&self) -> Vec<DeadLetter> {
        Vec::new()
    }
}

pub(crate) struct QueueState {
    pub ready: VecDeque<QueueMessage>,
    pub in_flight: usize,
    pub closed: bool,
    pub consumer_attached: bool,
}

/// State shared between the queue handle, its consumer and deliveries.
pub(crate) struct QueueShared {
    pub name: String,
    pub capacity: usize,
    pub state: Mutex<QueueState>,
    pub notify: Notify,
    pub stats: QueueStats,
    pub dead_letters: Mutex<DeadLetterBuffer>,
}

impl QueueShared {
    pub(crate) fn requeue(&self, mut message: QueueMessage) {
        message.attempt = message.attempt.saturating_add(1);
        {
            let mut state = self.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.ready.push_front(message);
        }
        self.stats.requeued.fetch_add(1, Ordering::Relaxed);
        self.notify.notify_one();
    }

    pub(crate) fn complete(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);
        self.stats.acknowledged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dead_letter(&self, message: QueueMessage, reason: String) {
        warn!(
            queue = %self.name,
            message_id = %message.id,
            reason = %reason,
            "Message moved to dead letter buffer"
        );
        self.dead_letters
            .lock()
            .push(DeadLetter::from_message(message, reason));
        self.stats.dead_lettered.fetch_add(1, Ordering::Relaxed);
        self.complete();
    }
}

/// In-memory implementation of the work queue.
///
/// Suitable for single-node operation. Nothing survives a restart.
/// Cloning the handle shares the same queue.
#[derive(Clone)]
pub struct InMemoryWorkQueue {
    shared: Arc<QueueShared>,
}

impl InMemoryWorkQueue {
    /// Create a queue with default capacity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a queue with the given capacity.
    #[must_use]
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            shared: Arc::new(QueueShared {
                name: name.into(),
                capacity,
                state: Mutex::new(QueueState {
                    ready: VecDeque::new(),
                    in_flight: 0,
                    closed: false,
                    consumer_attached: false,
                }),
                notify: Notify::new(),
                stats: QueueStats::default(),
                dead_letters: Mutex::new(DeadLetterBuffer::with_capacity(DEAD_LETTER_CAPACITY)),
            }),
        }
    }

    /// Attach the single consumer.
    ///
    /// # Errors
    ///
    /// [`SubscriptionError::ConsumerAttached`] if another consumer holds the queue.
    pub fn consume(&self) -> Result<QueueConsumer, SubscriptionError> {
        let mut state = self.shared.state.lock();
        if state.consumer_attached {
            return Err(SubscriptionError::ConsumerAttached {
                queue: self.shared.name.clone(),
            });
        }
        state.consumer_attached = true;
        drop(state);

        debug!(queue = %self.shared.name, "Consumer attached");
        Ok(QueueConsumer::new(Arc::clone(&self.shared)))
    }

    /// Stop accepting publishes. Messages already queued are still delivered.
    pub fn close(&self) {
        self.shared.state.lock().closed = true;
        self.shared.notify.notify_one();
        debug!(queue = %self.shared.name, "Queue closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Messages waiting for delivery.
    #[must_use]
    pub fn ready_len(&self) -> usize {
        self.shared.state.lock().ready.len()
    }

    /// Messages delivered but not yet acknowledged.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.state.lock().in_flight
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    #[must_use]
    pub fn stats(&self) -> QueueStatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Retained dead letters, oldest first.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.shared.dead_letters.lock().snapshot()
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn publish(&self, payload: Vec<u8>) -> Result<Uuid, PublishError> {
        let message = QueueMessage::new(&self.shared.name, payload);
        let id = message.id;

        {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(PublishError::Closed {
                    queue: self.shared.name.clone(),
                });
            }
            if state.ready.len() + state.in_flight >= self.shared.capacity {
                return Err(PublishError::Full {
                    queue: self.shared.name.clone(),
                    capacity: self.shared.capacity,
                });
            }
            state.ready.push_back(message);
        }

        self.shared.stats.published.fetch_add(1, Ordering::Relaxed);
        self.shared.notify.notify_one();

        debug!(queue = %self.shared.name, message_id = %id, "Message published");
        Ok(id)
    }

    fn name(&self) -> &str {
        &self.shared.name
    }

    fn stats(&self) -> QueueStatsSnapshot {
        InMemoryWorkQueue::stats(self)
    }

    fn dead_letters(&self) -> Vec<DeadLetter> {
        InMemoryWorkQueue::dead_letters(self)
    }
}

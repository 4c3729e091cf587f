//! # Work Queue Consumer
//!
//! Defines the receiving side of the work queue.

use crate::messages::QueueMessage;
use crate::publisher::QueueShared;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from attaching a consumer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The queue already has its single consumer.
    #[error("queue `{queue}` already has a consumer")]
    ConsumerAttached { queue: String },
}

/// The single consumer of a queue.
///
/// When dropped, the consumer slot is released.
pub struct QueueConsumer {
    shared: Arc<QueueShared>,
}

impl QueueConsumer {
    pub(crate) fn new(shared: Arc<QueueShared>) -> Self {
        Self { shared }
    }

    /// Receive the next message.
    ///
    /// # Returns
    ///
    /// - `Some(delivery)` - The next message
    /// - `None` - The queue is closed and fully drained
    pub async fn recv(&mut self) -> Option<Delivery> {
        loop {
            {
                let mut state = self.shared.state.lock();
                if let Some(message) = state.ready.pop_front() {
                    state.in_flight += 1;
                    return Some(Delivery::new(message, Arc::clone(&self.shared)));
                }
                if state.closed {
                    return None;
                }
            }
            // notify_one stores a permit when nobody waits, so a publish
            // between the check above and this await is not lost.
            self.shared.notify.notified().await;
        }
    }

    /// Receive without waiting.
    ///
    /// # Returns
    ///
    /// `None` if no message is ready right now.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        let mut state = self.shared.state.lock();
        let message = state.ready.pop_front()?;
        state.in_flight += 1;
        Some(Delivery::new(message, Arc::clone(&self.shared)))
    }

    /// Name of the consumed queue.
    #[must_use]
    pub fn queue_name(&self) -> &str {
        &self.shared.name
    }
}

impl Drop for QueueConsumer {
    fn drop(&mut self) {
        self.shared.state.lock().consumer_attached = false;
        debug!(queue = %self.shared.name, "Consumer detached");
    }
}

/// A message handed to the consumer.
///
/// Must be settled with [`Delivery::ack`] or [`Delivery::dead_letter`].
/// Dropping it unsettled puts the message back at the head of the queue.
pub struct Delivery {
    message: Option<QueueMessage>,
    shared: Arc<QueueShared>,
}

impl Delivery {
    fn new(message: QueueMessage, shared: Arc<QueueShared>) -> Self {
        Self {
            message: Some(message),
            shared,
        }
    }

    /// The delivered message.
    #[must_use]
    pub fn message(&self) -> &QueueMessage {
        // Only `None` after settlement, which consumes `self`.
        match &self.message {
            Some(message) => message,
            None => unreachable!("delivery settled twice"),
        }
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.message().payload
    }

    /// Acknowledge processing. The message is gone for good.
    pub fn ack(mut self) {
        if self.message.take().is_some() {
            self.shared.complete();
        }
    }

    /// Acknowledge without processing and keep a copy for investigation.
    pub fn dead_letter(mut self, reason: impl Into<String>) {
        if let Some(message) = self.message.take() {
            self.shared.dead_letter(message, reason.into());
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        if let Some(message) = self.message.take() {
            debug!(
                queue = %self.shared.name,
                message_id = %message.id,
                "Unacknowledged delivery requeued"
            );
            self.shared.requeue(message);
        }
    }
}

//! # Queue Messages
//!
//! The unit carried by the work queue, and its delivery counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// A message sitting in, or delivered from, the work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Unique message id, assigned at publish time.
    pub id: Uuid,
    /// Name of the queue the message was published to.
    pub queue: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
    /// When the message was accepted.
    pub published_at: DateTime<Utc>,
    /// Delivery attempt, starting at 1. Incremented on every requeue.
    pub attempt: u32,
}

impl QueueMessage {
    pub(crate) fn new(queue: &str, payload: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            queue: queue.to_string(),
            payload,
            published_at: Utc::now(),
            attempt: 1,
        }
    }
}

/// Lifetime counters for a queue.
#[derive(Debug, Default)]
pub(crate) struct QueueStats {
    pub published: AtomicU64,
    pub acknowledged: AtomicU64,
    pub requeued: AtomicU64,
    pub dead_lettered: AtomicU64,
}

impl QueueStats {
    pub(crate) fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`QueueStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatsSnapshot {
    pub published: u64,
    pub acknowledged: u64,
    pub requeued: u64,
    pub dead_lettered: u64,
}

//! # Dead Letter Buffer
//!
//! Bounded record of messages the consumer gave up on.
//!
//! - Entries are kept for investigation only, never redelivered
//! - When full, the oldest entry is evicted
//! - This bounds memory usage under a stream of poison messages

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::messages::QueueMessage;

/// A message that was acknowledged without being applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub message_id: Uuid,
    pub queue: String,
    pub payload: Vec<u8>,
    pub attempt: u32,
    /// Why the consumer rejected the message.
    pub reason: String,
    pub dead_lettered_at: DateTime<Utc>,
}

impl DeadLetter {
    pub(crate) fn from_message(message: QueueMessage, reason: String) -> Self {
        Self {
            message_id: message.id,
            queue: message.queue,
            payload: message.payload,
            attempt: message.attempt,
            reason,
            dead_lettered_at: Utc::now(),
        }
    }

    /// The payload as text, lossy, for logging.
    #[must_use]
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Fixed-capacity FIFO of [`DeadLetter`]s.
#[derive(Debug)]
pub struct DeadLetterBuffer {
    entries: VecDeque<DeadLetter>,
    capacity: usize,
    evicted: u64,
}

impl DeadLetterBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Add an entry, evicting the oldest if the buffer is full.
    pub fn push(&mut self, letter: DeadLetter) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(letter);
    }

    /// Copy of all retained entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeadLetter> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped to stay within capacity.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

//! # Shared Bus - Work Queue for Vote Batches
//!
//! Decouples accepting a vote batch from persisting it.
//!
//! ## Relay Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Ingestion   │                    │   Consumer   │
//! │  endpoint    │    publish()       │  (single)    │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │ recv() / ack()
//!                  │  Work Queue  │ ─────────┘
//!                  └──────────────┘
//! ```
//!
//! ## Delivery Semantics
//!
//! - **Non-durable:** messages live in process memory only
//! - **At-least-once:** a [`Delivery`] dropped without [`Delivery::ack`] is
//!   requeued at the front of the queue
//! - **Dead Letter Buffer:** malformed payloads are acknowledged and kept in
//!   a bounded buffer for investigation; they are never redelivered

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dead_letter;
pub mod messages;
pub mod publisher;
pub mod subscriber;

pub use dead_letter::{DeadLetter, DeadLetterBuffer};
pub use messages::{QueueMessage, QueueStatsSnapshot};
pub use publisher::{InMemoryWorkQueue, PublishError, WorkQueue};
pub use subscriber::{Delivery, QueueConsumer, SubscriptionError};

/// Maximum messages held (ready plus in flight) before publishes are refused.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Maximum dead letters retained; the oldest is evicted first.
pub const DEAD_LETTER_CAPACITY: usize = 100;

/// Queue name used when none is configured.
pub const DEFAULT_QUEUE_NAME: &str = "votes";

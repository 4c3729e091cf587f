//! # Queue Relay (vt-03)
//!
//! Decouples vote ingestion from persistence. The ingestion endpoint hands
//! each batch to [`VotePublisher`] and returns; a single [`VoteConsumer`]
//! drains the queue and applies the batches through the tally service.
//!
//! ## Message Flow
//!
//! ```text
//! POST /vote ──VoteBatch──→ VotePublisher ──bytes──→ WorkQueue
//!                             (RetryPolicy)             │
//!                                                       ↓
//!                                   VoteConsumer ←── Delivery
//!                                        │
//!                  ┌─────────────────────┼──────────────────────┐
//!                  ↓                     ↓                      ↓
//!          malformed batch          valid batch           store failure
//!          dead-letter + ack     record_batch + ack      log + ack
//! ```
//!
//! ## Delivery Guarantees
//!
//! | Stage | Guarantee |
//! |-------|-----------|
//! | Publish | Reported to the caller after bounded retries, never panics |
//! | Queue | At-least-once while the process lives; nothing survives a restart |
//! | Consume | Whole batch validated before the first increment |
//!
//! A store failure part way through a batch is acknowledged rather than
//! redelivered, so names applied before the failure are never counted twice.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod consumer;
pub mod publisher;
pub mod retry;

pub use consumer::{MessageOutcome, VoteConsumer};
pub use publisher::{RelayError, VotePublisher};
pub use retry::RetryPolicy;

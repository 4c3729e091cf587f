//! # Tally Reporter (vt-04)
//!
//! Read side of the tally.
//!
//! - **Pull**: [`TallyReporter::snapshot`] returns every record ranked by
//!   count, highest first, ties broken by name.
//! - **Push**: [`TallyBroadcaster`] runs one ticker for the whole process.
//!   Each tick reads the ranked tally once and fans it out to every live
//!   [`TallySubscription`]. With no subscribers the tick is skipped without
//!   touching the store.
//!
//! ## Subscription Lifecycle
//!
//! ```text
//! subscribe() ──→ TallySubscription ──recv()──→ Arc<Vec<TallyRecord>>
//!                        │
//!                      drop ──→ receiver released, ticker stops reading
//!                               once the last one is gone
//! ```
//!
//! A subscriber that falls behind skips straight to the newest snapshot.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod broadcaster;
pub mod reporter;

pub use broadcaster::{TallyBroadcaster, TallySubscription, Snapshot, DEFAULT_PUSH_INTERVAL};
pub use reporter::{rank, TallyReporter};

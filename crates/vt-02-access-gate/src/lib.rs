//! # Access Gate (vt-02)
//!
//! One-time access codes. A code admits exactly one vote submission; every
//! later presentation of the same code is refused.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | First Presentation Wins | Of any number of concurrent presentations, exactly one is `Valid` |
//! | 2 | No Mutation On Refusal | An `Invalid` verdict leaves the store unchanged |
//! | 3 | Opaque Codes | Codes are compared byte for byte, no case folding |
//!
//! Invariant 1 rests entirely on [`AccessCodeStore::insert_if_absent`];
//! the gate never reads before it writes.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vt_01_tally_store::InMemoryAccessCodeStore;
//! use vt_02_access_gate::{AccessGate, CodeVerdict};
//!
//! let gate = AccessGate::new(Arc::new(InMemoryAccessCodeStore::new()));
//! assert_eq!(gate.consume("x1").await?, CodeVerdict::Valid);
//! assert_eq!(gate.consume("x1").await?, CodeVerdict::Invalid);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod gate;

pub use gate::{AccessGate, CodeVerdict};

pub use vt_01_tally_store::{AccessCodeStore, StoreError};

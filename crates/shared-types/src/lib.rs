//! # Shared Types Crate
//!
//! This crate contains the domain entities and the queue message envelope
//! used by every tally subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Normalize Once**: A [`TallyName`] can only be built through
//!   [`TallyName::parse`], so the direct-write path and the queue consumer
//!   apply the exact same case folding before touching the store.
//! - **Validate Whole Batches**: [`VoteBatch::normalized`] checks every name
//!   before returning any of them, so a bad element never causes a partial
//!   write.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::VoteBatch;
pub use errors::*;

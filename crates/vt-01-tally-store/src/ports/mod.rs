//! Ports for the tally store.

pub mod outbound;

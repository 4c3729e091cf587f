//! Domain layer for the tally store.

pub mod errors;
pub mod strategy;

//! REST handlers.

pub mod queue;
pub mod tally;
pub mod vote;

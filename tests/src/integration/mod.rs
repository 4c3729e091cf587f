//! Cross-crate integration flows.

pub mod access;
#[cfg(test)]
pub mod fixtures;
pub mod ingestion;
pub mod node;
pub mod push;

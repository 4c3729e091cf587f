//! # Service Container
//!
//! Builds every subsystem once at startup and hands out shared handles.
//! Nothing in the node is a global; stores, queue and services are created
//! here and injected.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::ServiceContainer;

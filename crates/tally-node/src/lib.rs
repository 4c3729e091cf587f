//! # Vote Tally Node
//!
//! Assembles the subsystems into one process.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem construction
//! - `runtime` - background tasks, HTTP serving and shutdown
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging and metrics
//! 3. Build stores, gate, relay and reporters
//! 4. Start the push ticker (and the vote consumer in queued mode)
//! 5. Serve HTTP until SIGINT or SIGTERM

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, ServiceContainer};
pub use runtime::NodeRuntime;

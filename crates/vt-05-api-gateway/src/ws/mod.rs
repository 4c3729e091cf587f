//! WebSocket push channel.

pub mod handler;

pub use handler::{push_upgrade, PushSession};

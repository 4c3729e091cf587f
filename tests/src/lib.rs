//! # Vote Tally Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for the hot paths
//! └── src/integration/  # Cross-crate flows
//!     ├── ingestion.rs  # Direct and queued vote paths through the router
//!     ├── access.rs     # One-time code races
//!     ├── push.rs       # Periodic snapshots to subscribers
//!     └── node.rs       # Full node over real sockets
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tally-tests
//! cargo test -p tally-tests integration::node::
//!
//! cargo bench -p tally-tests
//! ```

pub mod integration;

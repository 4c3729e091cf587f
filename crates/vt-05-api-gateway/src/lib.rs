//! VT-05 API Gateway - HTTP and WebSocket surface of the vote tally service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      API GATEWAY (vt-05)                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  POST /vote   GET /votes   GET /codeExists/:code   GET /ws       │
//! │  GET /health  GET /metrics                                       │
//! │                                                                  │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │ Middleware: Cors → Tracing → BodyLimit                     │  │
//! │  └────────────────────────────┬───────────────────────────────┘  │
//! └───────────────────────────────┼──────────────────────────────────┘
//!                                 │
//!       ┌──────────────┬──────────┴─────────┬────────────────┐
//!       ▼              ▼                    ▼                ▼
//! vt-02-access   vt-01-tally-store   vt-03-queue-relay   vt-04-tally-reporter
//! ```
//!
//! # Ingest Modes
//!
//! - **Direct**: `POST /vote` applies every increment before responding
//! - **Queued**: `POST /vote` publishes the batch and responds immediately;
//!   the vt-03 consumer applies it later
//!
//! # Usage
//!
//! ```ignore
//! use vt_05_api_gateway::{ApiGatewayService, AppState, GatewayConfig};
//!
//! let service = ApiGatewayService::new(GatewayConfig::default(), state)?;
//! service.serve(shutdown_rx).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod middleware;
pub mod rest;
pub mod service;
pub mod ws;

#[cfg(test)]
mod test_support;

pub use domain::config::{ConfigError, CorsConfig, GatewayConfig, HttpConfig, IngestMode};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use service::{ApiGatewayService, AppState, Ingest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

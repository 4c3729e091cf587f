//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Cors → Tracing → BodyLimit → Handler

pub mod cors;
pub mod tracing;

pub use self::cors::create_cors_layer;
pub use self::tracing::TracingLayer;

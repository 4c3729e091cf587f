//! API Gateway error types.
//!
//! Client-facing bodies are always `{"error": "<message>"}`. Infrastructure
//! detail never reaches the client; it is logged where the error is built.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Message for a malformed `POST /vote` body.
pub const INVALID_BODY: &str = "Invalid request body";

/// Message for a missing, reused or malformed access code.
pub const INVALID_CODE: &str = "Invalid code";

/// Message for any server-side failure.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Error returned by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Client-facing message
    pub message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// 400, body failed the `{"names": [string, ...]}` shape check
    pub fn invalid_body() -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    }

    /// 400, access code missing or not accepted
    pub fn invalid_code() -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_CODE)
    }

    /// 500 with a generic message. `detail` is logged, never returned.
    pub fn internal(detail: impl fmt::Display) -> Self {
        error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (not returned to clients)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(std::io::Error),

    /// Server terminated with an error
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

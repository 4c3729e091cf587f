//! Read endpoints plus health and metrics.

use crate::domain::error::{ApiError, ApiResult};
use crate::service::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use shared_types::TallyRecord;
use tally_telemetry::{encode_metrics, metric_inc, ACCESS_CODES};

/// `GET /votes`: the full tally, highest count first.
pub async fn list_votes(State(state): State<AppState>) -> ApiResult<Json<Vec<TallyRecord>>> {
    let records = state.reporter.snapshot().await.map_err(ApiError::internal)?;
    Ok(Json(records))
}

/// `GET /codeExists/:code`: `true` if the code was already seen.
///
/// An unseen code is recorded, so the next call answers `true`.
pub async fn code_exists(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<bool>> {
    let existed = state.gate.code_exists(&code).await.map_err(ApiError::internal)?;
    let verdict = if existed { "invalid" } else { "valid" };
    metric_inc!(ACCESS_CODES, &[verdict]);
    Ok(Json(existed))
}

/// `GET /health`
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics() -> ApiResult<impl IntoResponse> {
    let body = encode_metrics().map_err(ApiError::internal)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

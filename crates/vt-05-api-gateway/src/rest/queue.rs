//! Work queue inspection, mounted only in queued mode.

use crate::domain::error::{ApiError, ApiResult};
use crate::service::{AppState, Ingest};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

/// `GET /queue`: delivery counters and retained dead letters.
pub async fn queue_status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let Ingest::Queued(publisher) = &state.ingest else {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "Not found"));
    };

    let dead_letters: Vec<Value> = publisher
        .dead_letters()
        .iter()
        .map(|letter| {
            json!({
                "message_id": letter.message_id,
                "attempt": letter.attempt,
                "reason": letter.reason,
                "payload": letter.payload_lossy(),
                "dead_lettered_at": letter.dead_lettered_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "queue": publisher.queue_name(),
        "stats": publisher.queue_stats(),
        "dead_letters": dead_letters,
    })))
}

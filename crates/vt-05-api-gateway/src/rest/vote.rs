//! `POST /vote`: vote ingestion.

use crate::domain::error::{ApiError, ApiResult};
use crate::service::{AppState, Ingest};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::VoteBatch;
use tally_telemetry::{metric_inc, ACCESS_CODES, VOTES_RECORDED};
use tracing::debug;
use vt_02_access_gate::CodeVerdict;

/// Query parameters of `POST /vote`.
#[derive(Debug, Default, Deserialize)]
pub struct VoteParams {
    pub code: Option<String>,
}

/// Accept a `{"names": [...]}` batch.
///
/// The body is fully validated before the access code is consumed, so a
/// malformed request never burns a code. An unparsable query string counts
/// as a missing code.
pub async fn submit_votes(
    State(state): State<AppState>,
    query: Result<Query<VoteParams>, QueryRejection>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let code = match query {
        Ok(Query(params)) => params.code,
        Err(e) => {
            debug!(error = %e, "Unparsable vote query");
            None
        }
    };

    let batch = VoteBatch::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected vote body");
        ApiError::invalid_body()
    })?;
    let names = batch.normalized().map_err(|e| {
        debug!(error = %e, "Rejected vote body");
        ApiError::invalid_body()
    })?;

    if state.require_code {
        let code = code.as_deref().unwrap_or_default();
        let verdict = state.gate.consume(code).await.map_err(ApiError::internal)?;
        match verdict {
            CodeVerdict::Valid => metric_inc!(ACCESS_CODES, &["valid"]),
            CodeVerdict::Invalid => {
                metric_inc!(ACCESS_CODES, &["invalid"]);
                return Err(ApiError::invalid_code());
            }
        }
    }

    match &state.ingest {
        Ingest::Direct => {
            let applied = state
                .tally
                .record_batch(&names)
                .await
                .map_err(ApiError::internal)?;
            VOTES_RECORDED
                .with_label_values(&["direct"])
                .inc_by(applied as f64);
        }
        Ingest::Queued(publisher) => {
            publisher.publish(&batch).await.map_err(ApiError::internal)?;
        }
    }

    Ok(Json(json!({ "message": "Votes saved successfully" })))
}

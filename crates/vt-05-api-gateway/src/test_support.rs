//! Router fixtures for handler tests.

use crate::domain::config::{GatewayConfig, IngestMode};
use crate::service::{ApiGatewayService, AppState, Ingest};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use shared_bus::InMemoryWorkQueue;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use vt_01_tally_store::{InMemoryAccessCodeStore, InMemoryTallyStore, TallyService};
use vt_02_access_gate::AccessGate;
use vt_03_queue_relay::{RetryPolicy, VotePublisher};
use vt_04_tally_reporter::{TallyBroadcaster, TallyReporter};

pub(crate) struct TestApp {
    pub store: Arc<InMemoryTallyStore>,
    pub config: GatewayConfig,
    pub state: AppState,
}

impl TestApp {
    fn build(ingest: Ingest) -> Self {
        let store = Arc::new(InMemoryTallyStore::new());
        let reporter = TallyReporter::new(store.clone());
        let config = GatewayConfig {
            ingest: ingest.mode(),
            ..GatewayConfig::default()
        };
        let state = AppState {
            tally: TallyService::new(store.clone()),
            reporter: reporter.clone(),
            broadcaster: TallyBroadcaster::new(reporter, Duration::from_millis(500)),
            gate: AccessGate::new(Arc::new(InMemoryAccessCodeStore::new())),
            ingest,
            require_code: false,
        };
        Self {
            store,
            config,
            state,
        }
    }

    pub fn direct() -> Self {
        Self::build(Ingest::Direct)
    }

    pub fn queued(queue: InMemoryWorkQueue) -> Self {
        let publisher = VotePublisher::with_retry(Arc::new(queue), RetryPolicy::no_retry());
        let app = Self::build(Ingest::Queued(publisher));
        debug_assert_eq!(app.config.ingest, IngestMode::Queued);
        app
    }

    pub fn with_required_code(mut self) -> Self {
        self.config.require_code = true;
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.config.http.max_body_bytes = bytes;
        self
    }

    pub fn router(&self) -> Router {
        ApiGatewayService::new(self.config.clone(), self.state.clone())
            .unwrap()
            .router()
    }
}

pub(crate) async fn post_vote(router: &Router, code: Option<&str>, body: &str) -> Response {
    let uri = match code {
        Some(code) => format!("/vote?code={code}"),
        None => "/vote".to_string(),
    };
    post_vote_uri(router, &uri, body).await
}

pub(crate) async fn post_vote_uri(router: &Router, uri: &str, body: &str) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub(crate) async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub(crate) async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

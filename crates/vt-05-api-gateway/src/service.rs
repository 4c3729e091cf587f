//! API Gateway service - router assembly and server lifecycle.

use crate::domain::config::{ConfigError, GatewayConfig, IngestMode};
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, TracingLayer};
use crate::rest;
use crate::ws;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tracing::info;
use vt_01_tally_store::TallyService;
use vt_02_access_gate::AccessGate;
use vt_03_queue_relay::VotePublisher;
use vt_04_tally_reporter::{TallyBroadcaster, TallyReporter};

/// Where accepted batches go.
#[derive(Clone)]
pub enum Ingest {
    /// Increment in the request.
    Direct,
    /// Publish and return.
    Queued(VotePublisher),
}

impl Ingest {
    pub fn mode(&self) -> IngestMode {
        match self {
            Self::Direct => IngestMode::Direct,
            Self::Queued(_) => IngestMode::Queued,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tally: TallyService,
    pub reporter: TallyReporter,
    pub broadcaster: TallyBroadcaster,
    pub gate: AccessGate,
    pub ingest: Ingest,
    pub require_code: bool,
}

/// API Gateway service
pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    /// Create the service.
    ///
    /// `require_code` on the state is taken from `config`.
    pub fn new(config: GatewayConfig, mut state: AppState) -> Result<Self, GatewayError> {
        config.validate()?;

        if config.ingest != state.ingest.mode() {
            return Err(ConfigError::InvalidIngestMode(format!(
                "configured `{}` but state was built for `{}`",
                config.ingest,
                state.ingest.mode()
            ))
            .into());
        }

        state.require_code = config.require_code;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new())
            .layer(DefaultBodyLimit::max(self.config.http.max_body_bytes));

        let mut router = Router::new()
            .route("/vote", post(rest::vote::submit_votes))
            .route("/votes", get(rest::tally::list_votes))
            .route("/codeExists/:code", get(rest::tally::code_exists))
            .route("/ws", get(ws::handler::push_upgrade))
            .route("/health", get(rest::tally::health_check))
            .route("/metrics", get(rest::tally::metrics));
        if matches!(self.state.ingest, Ingest::Queued(_)) {
            router = router.route("/queue", get(rest::queue::queue_status));
        }

        router
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` flips to
    /// `true`. In-flight requests are allowed to finish.
    pub async fn serve(self, shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr).await.map_err(GatewayError::Bind)?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let router = self.router();
        info!(
            addr = ?listener.local_addr().ok(),
            ingest = %self.config.ingest,
            require_code = self.config.require_code,
            "API Gateway listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                // Err means the sender is gone, which also ends serving.
                let _ = shutdown.wait_for(|stop| *stop).await;
                info!("API Gateway shutting down");
            })
            .await
            .map_err(GatewayError::Serve)
    }
}

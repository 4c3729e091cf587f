//! Shared fixtures: a node's subsystems behind a ready router.

use std::ops::Deref;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tally_node::{NodeConfig, ServiceContainer};
use tokio::task::JoinHandle;
use tower::ServiceExt;
use vt_05_api_gateway::{ApiGatewayService, IngestMode};

/// Subsystems plus the router serving them.
pub struct Harness {
    pub container: Arc<ServiceContainer>,
    pub client: RouterClient,
    consumer: Option<JoinHandle<u64>>,
}

impl Deref for Harness {
    type Target = RouterClient;

    fn deref(&self) -> &RouterClient {
        &self.client
    }
}

impl Harness {
    pub fn new(config: NodeConfig) -> Self {
        let container = Arc::new(ServiceContainer::new(config).expect("container"));
        let gateway =
            ApiGatewayService::new(container.config.gateway(), container.app_state())
                .expect("gateway");

        let consumer = match (&container.queue, container.vote_consumer()) {
            (Some(queue), Some(consumer)) => {
                let subscription = queue.consume().expect("single consumer");
                Some(tokio::spawn(async move { consumer.run(subscription).await }))
            }
            _ => None,
        };

        Self {
            client: RouterClient::new(gateway.router()),
            container,
            consumer,
        }
    }

    pub fn direct() -> Self {
        Self::new(NodeConfig::default())
    }

    pub fn queued() -> Self {
        Self::new(NodeConfig {
            ingest: IngestMode::Queued,
            ..NodeConfig::default()
        })
    }

    pub fn with_required_code(ingest: IngestMode) -> Self {
        Self::new(NodeConfig {
            ingest,
            require_code: true,
            ..NodeConfig::default()
        })
    }

    /// Close the queue and wait until every accepted batch is applied.
    ///
    /// # Returns
    ///
    /// Messages the consumer settled.
    pub async fn drain(&mut self) -> u64 {
        if let Some(queue) = &self.container.queue {
            queue.close();
        }
        match self.consumer.take() {
            Some(handle) => handle.await.expect("consumer task"),
            None => 0,
        }
    }
}

/// Requests sent straight into a router, no socket involved.
#[derive(Clone)]
pub struct RouterClient {
    router: Router,
}

impl RouterClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn post_vote(&self, code: Option<&str>, body: &str) -> (StatusCode, Value) {
        let uri = match code {
            Some(code) => format!("/vote?code={code}"),
            None => "/vote".to_string(),
        };
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    /// `GET /votes` as `(name, count)` pairs in response order.
    pub async fn tallies(&self) -> Vec<(String, u64)> {
        let (status, body) = self.get("/votes").await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .expect("array")
            .iter()
            .map(|record| {
                (
                    record["name"].as_str().expect("name").to_string(),
                    record["count"].as_u64().expect("count"),
                )
            })
            .collect()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

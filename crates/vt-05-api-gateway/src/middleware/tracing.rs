//! Tracing middleware.
//!
//! Wraps every request in an `http_request` span, logs the outcome with
//! latency, and feeds the HTTP request metrics.

use axum::{body::Body, extract::MatchedPath, http::Request, response::Response};
use std::task::{Context, Poll};
use std::time::Instant;
use tally_telemetry::{HTTP_DURATION, HTTP_REQUESTS};
use tower::{Layer, Service};
use tracing::{info, info_span, warn, Instrument, Span};

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let method = req.method().clone();
        let route = route_label(&req);

        let span = info_span!(
            "http_request",
            http.method = %method,
            http.target = %req.uri().path(),
            http.route = %route,
            http.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(req).await;
                let elapsed = started.elapsed();

                HTTP_DURATION
                    .with_label_values(&[route.as_str()])
                    .observe(elapsed.as_secs_f64());

                if let Ok(response) = &result {
                    let status = response.status();
                    Span::current().record("http.status_code", status.as_u16());
                    HTTP_REQUESTS
                        .with_label_values(&[method.as_str(), route.as_str(), status.as_str()])
                        .inc();

                    let latency_ms = elapsed.as_secs_f64() * 1000.0;
                    if status.is_server_error() {
                        warn!(status = status.as_u16(), latency_ms, "Request failed");
                    } else {
                        info!(status = status.as_u16(), latency_ms, "Request served");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Route template for labels, so `/codeExists/abc` and `/codeExists/xyz`
/// share one series.
fn route_label<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

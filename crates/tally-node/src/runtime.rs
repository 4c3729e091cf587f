//! Node lifecycle: background tasks, HTTP serving, ordered shutdown.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vt_05_api_gateway::ApiGatewayService;

use crate::container::{NodeConfig, ServiceContainer};

/// The running node.
///
/// ## Shutdown Order
///
/// 1. Flip the shutdown signal; the gateway stops accepting and drains
///    in-flight requests, the push ticker exits
/// 2. Close the work queue so no further batch is accepted
/// 3. Wait for the consumer to apply everything already queued
pub struct NodeRuntime {
    container: Arc<ServiceContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl NodeRuntime {
    /// Validate `config` and build every subsystem.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid node configuration")?;
        let container =
            ServiceContainer::new(config).context("failed to initialize subsystems")?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Vec::new(),
        })
    }

    pub fn container(&self) -> &Arc<ServiceContainer> {
        &self.container
    }

    /// Spawn the push ticker and, in queued mode, the vote consumer.
    pub fn start(&mut self) -> Result<()> {
        if !self.tasks.is_empty() {
            return Ok(());
        }

        let broadcaster = self.container.broadcaster.clone();
        let shutdown = self.shutdown_rx.clone();
        self.tasks.push((
            "push-ticker",
            tokio::spawn(async move { broadcaster.run(shutdown).await }),
        ));

        if let (Some(queue), Some(consumer)) =
            (self.container.queue.as_ref(), self.container.vote_consumer())
        {
            let subscription = queue
                .consume()
                .context("failed to attach the vote consumer")?;
            self.tasks.push((
                "vote-consumer",
                tokio::spawn(async move {
                    consumer.run(subscription).await;
                }),
            ));
        }

        info!(tasks = self.tasks.len(), "Background tasks started");
        Ok(())
    }

    /// Bind the configured HTTP address.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.container.config.gateway().http_addr();
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))
    }

    /// Serve on `listener` until `signal` resolves, then shut down in order.
    pub async fn run_until<F>(mut self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        self.start()?;

        let gateway =
            ApiGatewayService::new(self.container.config.gateway(), self.container.app_state())
                .context("failed to build the API gateway")?;
        let server = tokio::spawn(gateway.serve_on(listener, self.shutdown_rx.clone()));

        signal.await;
        info!("Shutdown requested");
        let _ = self.shutdown_tx.send(true);

        match server.await {
            Ok(result) => result.context("HTTP server failed")?,
            Err(e) => warn!(error = %e, "HTTP server task aborted"),
        }

        self.shutdown().await;
        Ok(())
    }

    /// Stop background tasks. Queued batches are applied before returning.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(queue) = &self.container.queue {
            queue.close();
        }

        for (name, handle) in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                warn!(task = name, error = %e, "Background task ended abnormally");
            }
        }
        info!("Node stopped");
    }
}

//! # Vote Tally Node
//!
//! Entry point. See the library crate for the startup sequence.

use anyhow::{Context, Result};
use tally_node::{NodeConfig, NodeRuntime};
use tally_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("failed to load configuration")?;
    info!(
        service = %telemetry.service_name,
        version = vt_05_api_gateway::VERSION,
        "Starting vote tally node"
    );

    let runtime = NodeRuntime::new(config)?;
    let listener = runtime.bind().await?;
    runtime.run_until(listener, shutdown_signal()).await
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

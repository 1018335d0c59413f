//! # Threat Runtime
//!
//! Entry point for the threat-map event server.

use anyhow::{Context, Result};
use threat_runtime::{RuntimeConfig, ThreatRuntime};
use threat_telemetry::{init_logging, TelemetryConfig};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_logging(&telemetry).context("failed to initialise logging")?;

    let config = RuntimeConfig::from_env();
    info!(
        service = %telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        host = %config.gateway.host,
        port = config.gateway.port,
        "Starting threat-map runtime"
    );

    let runtime = ThreatRuntime::new(config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received; shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for Ctrl-C; running until killed");
                // The sender stays alive, so the runtime keeps serving.
                std::future::pending::<()>().await;
            }
        }
    });

    runtime.run(shutdown_rx).await
}

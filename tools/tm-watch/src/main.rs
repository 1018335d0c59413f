//! tm-watch: Threat-Map stream subscriber

use anyhow::{bail, Context, Result};
use clap::Parser;
use threat_telemetry::{init_logging, TelemetryConfig};
use tm_06_resilient_client::{ClientEvent, ResilientClient};
use tm_watch::render::{render_lifecycle, render_message};
use tm_watch::Args;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if std::env::var_os("TM_LOG_LEVEL").is_none() && std::env::var_os("RUST_LOG").is_none() {
        telemetry.log_level = "warn".to_string();
    }
    init_logging(&telemetry).context("failed to initialise logging")?;

    let client =
        ResilientClient::new(args.client_config()).context("invalid client configuration")?;
    let mut events = client.events();
    client.connect()?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ClientEvent::Message(message)) => {
                    if let Some(line) = render_message(&message, args.json) {
                        println!("{line}");
                    }
                }
                Ok(ClientEvent::GaveUp { attempts }) => {
                    bail!("gave up on {} after {attempts} reconnect attempts", args.url);
                }
                Ok(event) => {
                    if let Some(line) = render_lifecycle(&event) {
                        eprintln!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => eprintln!("output lagging; skipped {skipped} events"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                client.disconnect()?;
                break;
            }
        }
    }

    Ok(())
}

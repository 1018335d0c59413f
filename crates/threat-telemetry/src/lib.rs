//! # Threat Telemetry
//!
//! Logging and metrics for the threat-map runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use threat_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//!
//! threat_telemetry::EVENTS_SYNTHESIZED.inc();
//! let body = threat_telemetry::gather_text()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TM_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TM_JSON_LOGS` | `false` | JSON formatted output |
//! | `TM_SERVICE_NAME` | `threat-map` | Service name recorded at startup |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_text, ACTIVE_STREAM_SESSIONS, EVENTS_SYNTHESIZED, FLOWS_EXPIRED, FRAMES_SENT,
    LISTENER_FAILURES, MALFORMED_FRAMES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to encode metrics: {0}")]
    Metrics(String),
}

//! Error types for the Resilient Client subsystem

use thiserror::Error;

use crate::domain::config::ConfigError;

/// Errors returned to callers of [`crate::ResilientClient`].
///
/// Transport failures never surface here; they become state transitions and
/// [`crate::ClientEvent`]s.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Client must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("Client task has stopped")]
    Stopped,
}

/// Failures reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Invalid connection request: {0}")]
    InvalidRequest(String),

    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Receive failed: {0}")]
    Receive(String),
}

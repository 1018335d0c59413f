//! # Connection Status
//!
//! State reported by the resilience layer to application code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical connection state of a transport session.
///
/// ```text
/// Disconnected → Connecting → Connected → { Disconnected | Error }
///       ↑                                         │
///       └──────────── reconnect scheduler ────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of a resilient client connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub is_connected: bool,
    pub status: ConnectionStatus,
    pub reconnect_attempts: u32,
    pub queued_messages: usize,
    /// Messages evicted from a full outbound queue since creation.
    #[serde(default)]
    pub dropped_messages: u64,
}

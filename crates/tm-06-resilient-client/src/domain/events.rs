//! Lifecycle events published by the client.

use shared_types::WireMessage;
use std::time::Duration;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Connected,
    /// The transport closed. `code` is the close code, when the peer sent one.
    Disconnected { code: Option<u16>, reason: String },
    Error(TransportError),
    /// A reconnect is scheduled after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    /// The attempt budget is exhausted; nothing further is scheduled.
    GaveUp { attempts: u32 },
    /// A decoded inbound frame.
    Message(WireMessage),
}

/// Host visibility. Hidden pauses the heartbeat, not the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

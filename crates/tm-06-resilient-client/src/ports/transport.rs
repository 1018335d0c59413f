//! Transport port.
//!
//! The resilience layer owns reconnects and heartbeats; a transport only
//! knows how to open one connection and move text frames over it.

use async_trait::async_trait;

use crate::domain::config::ClientConfig;
use crate::error::TransportError;

/// One inbound event from an open session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// The peer closed, or the stream ended (`code` is `None` then).
    Closed { code: Option<u16>, reason: String },
}

/// Opens sessions (driven port).
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        config: &ClientConfig,
    ) -> Result<Box<dyn TransportSession>, TransportError>;
}

/// An open connection.
///
/// `recv` must be cancel-safe: the client polls it inside `select!`.
#[async_trait]
pub trait TransportSession: Send {
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    async fn recv(&mut self) -> Result<Inbound, TransportError>;

    async fn close(&mut self, code: u16, reason: &str) -> Result<(), TransportError>;
}

//! # TM-06 Resilient Client
//!
//! Wraps one transport connection with reconnect, heartbeat and an outbound
//! queue, so callers only ever see [`ClientEvent`]s and decoded frames.
//!
//! ## State Machine
//!
//! ```text
//! Disconnected ──connect()──→ Connecting ──ok──→ Connected
//!      ↑                          │                 │
//!      │                        error       close / error
//!      │                          ↓                 ↓
//!      └──── GaveUp ←──── reconnect scheduler ←─────┘
//! ```
//!
//! A close with code 1000 (explicit `disconnect()` or a normal server
//! closure) does not schedule a reconnect.
//!
//! ## Reconnect Policy
//!
//! `delay = reconnectDelay × 2^(attempt-1)`, capped at `maxReconnectDelay`.
//! The attempt counter resets on every successful connect. Once
//! `maxReconnectAttempts` is exhausted a single `GaveUp` event is emitted and
//! no further attempt is scheduled.
//!
//! ## Outbound Queue
//!
//! `send()` while not connected enqueues into a bounded FIFO that evicts the
//! oldest entry. The queue is flushed, oldest first, before any command that
//! arrives after the `Connected` transition. A frame that fails during flush
//! is not re-queued.
//!
//! ## Concurrency
//!
//! All connection state lives in one actor task fed by an unbounded command
//! channel. [`ResilientClient`] is a cheap handle; dropping it stops the
//! actor and closes the connection with code 1000.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::tungstenite::TungsteniteConnector;
pub use domain::backoff::BackoffPolicy;
pub use domain::config::{ClientConfig, ConfigError, NORMAL_CLOSURE};
pub use domain::events::{ClientEvent, Visibility};
pub use domain::listeners::{ListenerRegistry, MessageListener, MessageListenerId};
pub use domain::queue::OutboundQueue;
pub use error::{ClientError, TransportError};
pub use ports::transport::{Connector, Inbound, TransportSession};
pub use service::ResilientClient;

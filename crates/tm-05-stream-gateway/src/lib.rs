//! # TM-05 Stream Gateway
//!
//! Server side of the transport: every accepted connection is its own
//! execution context.
//!
//! ## Routes
//!
//! | Route | Session |
//! |-------|---------|
//! | `GET /ws` | Per-connection WebSocket. Own `PairSynthesizer` and interval; welcome first, then `update` frames. Answers `ping` with `pong`. |
//! | `GET /sse` | Same event sequence as Server-Sent Events, with keep-alive comments. |
//! | `GET /ws/live` | WebSocket fed by the shared `DispatcherContext`: `snapshot` first, then one `update` per tick. |
//! | `GET /snapshot` | Current dispatcher buffers as JSON. |
//! | `GET /health` | Liveness plus open session count. |
//! | `GET /metrics` | Prometheus text exposition. |
//!
//! ## Session Teardown
//!
//! Each session owns its interval and a `SessionGuard`. Both are dropped on
//! the same path that observes the close frame, socket error or client
//! disconnect, so no timer outlives its connection. `SessionRegistry`
//! exposes the open set for health checks and tests.
//!
//! ## Inbound Frames
//!
//! - `ping` → `pong`
//! - any other well-formed frame → ignored (debug log)
//! - malformed or oversized → logged, counted, dropped; the connection stays
//!   open

pub mod domain;
pub mod middleware;
pub mod service;
pub mod sse;
pub mod ws;

pub use domain::config::{ConfigError, CorsConfig, GatewayConfig};
pub use domain::error::GatewayError;
pub use domain::session::{SessionGuard, SessionId, SessionKind, SessionRegistry};
pub use service::{AppState, StreamGateway};

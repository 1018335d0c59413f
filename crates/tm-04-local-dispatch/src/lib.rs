//! # TM-04 Local Dispatch
//!
//! In-process pub/sub between the synthesizer/store pair and any number of
//! listeners, driven by one shared timer.
//!
//! ## Timer Lifecycle
//!
//! ```text
//! subscribers: 0 ──subscribe──▶ 1   start timer
//!              1 ──subscribe──▶ n   (no change)
//!              n ─unsubscribe─▶ 1   (no change)
//!              1 ─unsubscribe─▶ 0   abort timer
//! ```
//!
//! The timer task holds only a weak reference to the context, so dropping
//! the last `DispatcherContext` handle also ends it.
//!
//! ## Delivery
//!
//! - A new listener receives `DispatchEvent::Snapshot` synchronously inside
//!   `subscribe`, before any tick.
//! - Each tick delivers `DispatchEvent::Tick` to listeners in registration
//!   order, outside the state lock.
//! - A listener that errors or panics is logged and counted; delivery to the
//!   others and the timer continue.
//! - A listener may call `subscribe` or `tick` from inside its callback. The
//!   nested delivery is queued and runs after the current fan-out.

mod config;
mod context;
mod error;
mod listener;

pub use config::DispatchConfig;
pub use context::{DispatcherContext, Subscription};
pub use error::DispatchError;
pub use listener::{DispatchEvent, Listener, ListenerId, ListenerResult};

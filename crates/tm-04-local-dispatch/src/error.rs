//! Error types for Local Dispatch

use thiserror::Error;
use tm_02_event_store::StoreConfigError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid store limits: {0}")]
    Store(#[from] StoreConfigError),

    #[error("BROADCAST_INTERVAL_MS must be greater than zero")]
    ZeroInterval,

    #[error("Subscribing requires a running Tokio runtime")]
    NoRuntime,
}

//! Error types for the Bounded Event Store

use thiserror::Error;

/// Rejected store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreConfigError {
    #[error("{name} must be greater than zero")]
    ZeroCapacity { name: &'static str },

    #[error("FLOW_TTL must be greater than zero")]
    ZeroTtl,
}

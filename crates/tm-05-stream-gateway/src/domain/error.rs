//! Gateway error types.

use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server socket bind error
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accept loop terminated with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

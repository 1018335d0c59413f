//! Error types for the Region Catalog subsystem

use thiserror::Error;

/// Errors that can occur loading a region catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog is not a valid region array: {0}")]
    Parse(#[from] serde_json::Error),
}

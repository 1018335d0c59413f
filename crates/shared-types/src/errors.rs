//! # Error Types
//!
//! Defines error types shared by every crate that touches the wire format.

use thiserror::Error;

/// Errors decoding or encoding a wire frame.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not valid JSON or does not match the envelope shape.
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The frame parsed, but its top level is not a JSON object.
    #[error("Frame is not a JSON object")]
    NotAnObject,
}

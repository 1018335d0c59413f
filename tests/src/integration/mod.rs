//! Cross-crate integration tests.

pub mod pipeline;
pub mod transport;

//! Transport adapters.

pub mod tungstenite;

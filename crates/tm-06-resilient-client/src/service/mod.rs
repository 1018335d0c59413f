//! Client handle and the connection actor behind it.

mod actor;
mod client;

pub use client::ResilientClient;

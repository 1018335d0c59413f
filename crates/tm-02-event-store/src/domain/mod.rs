//! Domain layer for the Bounded Event Store.

pub mod config;
pub mod snapshot;
pub mod store;

//! Ports for the Bounded Event Store.

pub mod inbound;

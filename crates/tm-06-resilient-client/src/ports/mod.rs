//! Ports (driven side): the transport the client wraps.

pub mod transport;

//! Gateway domain: configuration, errors, session bookkeeping, inbound
//! frame handling.

pub mod config;
pub mod error;
pub mod inbound;
pub mod session;

//! Resilience domain: configuration, backoff, queueing and listener routing.

pub mod backoff;
pub mod config;
pub mod events;
pub mod listeners;
pub mod queue;

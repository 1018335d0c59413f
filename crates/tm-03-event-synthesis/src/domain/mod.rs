//! Domain layer for Event Synthesis.

pub mod identity;
pub mod pairs;
pub mod severity;
pub mod synthesizer;

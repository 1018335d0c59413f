//! tm-watch: print live threat events from a stream gateway.

pub mod args;
pub mod render;

pub use args::Args;

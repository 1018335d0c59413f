//! # Shared Types Crate
//!
//! This crate contains the domain entities and wire message types that flow
//! through the threat-event pipeline:
//!
//! ```text
//! Region Catalog → Synthesizer → Event Store → Dispatcher → Transport → Client
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Immutable Records**: `Feature` and `Flow` are never mutated after
//!   creation; eviction replaces, it does not edit.
//! - **Open Wire Protocol**: `MessageKind` is a closed enum with an explicit
//!   passthrough variant, so unknown message types are data, not errors.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod status;
pub mod time;

pub use entities::*;
pub use envelope::*;
pub use errors::*;
pub use status::*;
pub use time::*;

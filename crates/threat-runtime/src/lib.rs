//! # Threat Runtime
//!
//! Process wiring:
//!
//! ```text
//! RegionCatalog + CategoryTable
//!         │
//!         ↓
//! DispatcherContext (one per process) ──→ /ws/live, /snapshot
//!         │
//! StreamGateway ──→ /ws, /sse (per-connection synthesizers)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load telemetry configuration and initialise logging
//! 2. Load `RuntimeConfig` (defaults, then environment overrides)
//! 3. Load the region catalog (file from `TM_REGION_CATALOG`, else built-in)
//! 4. Build the dispatcher and gateway
//! 5. Serve until Ctrl-C, then close sessions and drain

pub mod config;
pub mod runtime;

pub use config::RuntimeConfig;
pub use runtime::ThreatRuntime;

//! # Threat-Map Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared builders (catalogs, dispatchers, gateways)
//! └── integration/
//!     ├── pipeline.rs   # Catalog → Synthesizer → Store → Dispatcher
//!     └── transport.rs  # Stream gateway ↔ resilient client over real sockets
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tm-tests
//! cargo test -p tm-tests integration::transport::
//!
//! # Benchmarks
//! cargo bench -p tm-tests
//! ```

pub mod fixtures;
pub mod integration;

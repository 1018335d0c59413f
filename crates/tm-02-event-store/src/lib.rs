//! # TM-02 Bounded Event Store
//!
//! Two fixed-capacity, insertion-ordered buffers: point features and
//! directed flows.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `features.len() <= feature_limit` | `domain/store.rs` - `push_feature()` |
//! | INVARIANT-2 | `flows.len() <= flow_limit` | `domain/store.rs` - `push_flow()` |
//! | INVARIANT-3 | Reads never return an expired flow | `domain/store.rs` - `snapshot()` / `current_flows()` prune first |
//!
//! ## Eviction
//!
//! ```text
//! features:  push_front ──▶ [newest … oldest] ──▶ pop_back  (capacity)
//! flows:     pop_front  ◀── [oldest … newest] ◀── push_back (capacity, TTL)
//! ```
//!
//! Both buffers are `VecDeque`s, so every push is O(1) amortized. TTL expiry
//! is lazy: it runs at the start of every read.
//!
//! ## Module Structure
//!
//! ```text
//! ports/inbound.rs  - EventSink (write side used by the synthesizer)
//! domain/config.rs  - StoreConfig
//! domain/store.rs   - BoundedEventStore
//! domain/snapshot.rs - StoreSnapshot (owned copy handed to readers)
//! ```

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::config::StoreConfig;
pub use domain::snapshot::StoreSnapshot;
pub use domain::store::BoundedEventStore;
pub use error::StoreConfigError;
pub use ports::inbound::EventSink;

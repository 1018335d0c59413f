//! # TM-03 Event Synthesis
//!
//! Produces synthetic attack records for the map.
//!
//! ## Pipeline
//!
//! ```text
//! RegionCatalog ──▶ EventSynthesizer::synthesize(now, ttl)
//!                     ├─ source index      (uniform)
//!                     ├─ destination index (uniform, offset on collision)
//!                     ├─ severity          (SeverityWeights, cumulative sum)
//!                     ├─ category          (CategoryTable, fallback if empty)
//!                     └─ synthetic IPs     (murmur3 of region|direction|timestamp)
//!                   ──▶ Feature(Source) + Feature(Destination) + Flow
//! ```
//!
//! `EventSynthesizer::tick_into` additionally pushes the result into any
//! `EventSink` (normally the `BoundedEventStore`).
//!
//! The server's per-connection sessions use `PairSynthesizer`, which draws
//! from a small fixed table of plausible source/destination pairs and emits
//! wire-ready `AttackEvent`s directly.
//!
//! ## Invariants
//!
//! - A catalog with fewer than two regions yields `None`; never panics.
//! - Source and destination regions of one event are always distinct.
//! - Synthetic IPs: first octet in `1..=223`, no octet is zero.

pub mod domain;

pub use domain::identity::derive_synthetic_ip;
pub use domain::pairs::{welcome_event, AttackPair, PairSynthesizer, ATTACK_PAIRS};
pub use domain::severity::SeverityWeights;
pub use domain::synthesizer::{EventSynthesizer, SynthesizedEvent, COLLISION_OFFSET};

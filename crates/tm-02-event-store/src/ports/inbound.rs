//! # Inbound Port - EventSink
//!
//! Write side of the store. The synthesizer only needs to push, so it
//! depends on this trait rather than on the concrete buffers.

use shared_types::{Feature, Flow};

/// Destination for synthesized features and flows.
pub trait EventSink {
    /// Record a feature; the sink enforces its own capacity.
    fn push_feature(&mut self, feature: Feature);

    /// Record a flow; the sink enforces its own capacity.
    fn push_flow(&mut self, flow: Flow);

    /// Lifetime the sink wants applied to new flows, in milliseconds.
    fn flow_ttl_ms(&self) -> u64;
}

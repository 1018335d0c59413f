//! Catalog-driven attack synthesis.

use rand::Rng;
use shared_types::{Direction, Feature, Flow, Timestamp};
use std::sync::Arc;
use tm_01_region_catalog::{CategoryTable, RegionCatalog};
use tm_02_event_store::EventSink;
use tracing::{debug, trace};
use uuid::{Builder, Uuid};

use super::identity::derive_synthetic_ip;
use super::severity::SeverityWeights;

/// Offset applied to the destination index when it collides with the
/// source. Any value works; the step is reduced modulo `len - 1`.
pub const COLLISION_OFFSET: usize = 7;

/// Output of one synthesis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedEvent {
    pub source: Feature,
    pub destination: Feature,
    pub flow: Flow,
}

impl SynthesizedEvent {
    pub fn features(&self) -> [&Feature; 2] {
        [&self.source, &self.destination]
    }
}

/// Produces one synthetic attack per call.
///
/// Generic over the RNG so tests can seed it.
pub struct EventSynthesizer<R: Rng> {
    catalog: Arc<RegionCatalog>,
    categories: Arc<CategoryTable>,
    weights: SeverityWeights,
    rng: R,
}

impl<R: Rng> EventSynthesizer<R> {
    pub fn new(catalog: Arc<RegionCatalog>, categories: Arc<CategoryTable>, rng: R) -> Self {
        if !catalog.supports_synthesis() {
            debug!(regions = catalog.len(), "Synthesis disabled: catalog too small");
        }
        Self {
            catalog,
            categories,
            weights: SeverityWeights::default(),
            rng,
        }
    }

    pub fn with_weights(mut self, weights: SeverityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn is_enabled(&self) -> bool {
        self.catalog.supports_synthesis()
    }

    /// Synthesize one event. `None` when the catalog has fewer than two
    /// regions.
    pub fn synthesize(&mut self, now: Timestamp, ttl_ms: u64) -> Option<SynthesizedEvent> {
        let catalog = Arc::clone(&self.catalog);
        let regions = catalog.regions();
        if regions.len() < 2 {
            return None;
        }

        let (src_index, dst_index) = self.pick_pair(regions.len());
        let severity = self.weights.sample(&mut self.rng);
        let category = self.categories.pick(&mut self.rng);

        let source = Feature {
            id: self.next_id().to_string(),
            synthetic_ip: derive_synthetic_ip(&regions[src_index].name, Direction::Source, now),
            region: regions[src_index].clone(),
            severity,
            category: category.clone(),
            timestamp: now,
            direction: Direction::Source,
        };
        let destination = Feature {
            id: self.next_id().to_string(),
            synthetic_ip: derive_synthetic_ip(
                &regions[dst_index].name,
                Direction::Destination,
                now,
            ),
            region: regions[dst_index].clone(),
            severity,
            category,
            timestamp: now,
            direction: Direction::Destination,
        };
        let flow = Flow::new(self.next_id().to_string(), &source, &destination, now, ttl_ms);

        trace!(
            flow_id = %flow.id,
            src = %flow.src.name,
            dst = %flow.dst.name,
            severity = %flow.severity,
            "Synthesized attack"
        );

        Some(SynthesizedEvent {
            source,
            destination,
            flow,
        })
    }

    /// Synthesize and push both features and the flow into `sink`, using
    /// the sink's flow TTL.
    pub fn tick_into<S: EventSink + ?Sized>(
        &mut self,
        sink: &mut S,
        now: Timestamp,
    ) -> Option<SynthesizedEvent> {
        let event = self.synthesize(now, sink.flow_ttl_ms())?;
        sink.push_feature(event.source.clone());
        sink.push_feature(event.destination.clone());
        sink.push_flow(event.flow.clone());
        Some(event)
    }

    fn pick_pair(&mut self, len: usize) -> (usize, usize) {
        let src = self.rng.gen_range(0..len);
        let mut dst = self.rng.gen_range(0..len);
        if dst == src {
            dst = (src + 1 + COLLISION_OFFSET % (len - 1)) % len;
        }
        (src, dst)
    }

    fn next_id(&mut self) -> Uuid {
        Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }
}

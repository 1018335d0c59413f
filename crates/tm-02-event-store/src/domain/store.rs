//! # Bounded Event Store
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: `features.len() <= feature_limit` after every push
//! - INVARIANT-2: `flows.len() <= flow_limit` after every push
//! - INVARIANT-3: reads prune first, so no returned flow has
//!   `expires_at <= now`

use shared_types::{Feature, Flow, Timestamp};
use std::collections::VecDeque;
use tracing::{debug, trace};

use super::config::StoreConfig;
use super::snapshot::StoreSnapshot;
use crate::error::StoreConfigError;
use crate::ports::inbound::EventSink;

/// Fixed-capacity feature and flow buffers with drop-oldest eviction.
#[derive(Debug, Clone)]
pub struct BoundedEventStore {
    config: StoreConfig,
    /// Newest at the front.
    features: VecDeque<Feature>,
    /// Oldest at the front.
    flows: VecDeque<Flow>,
}

impl BoundedEventStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreConfigError> {
        config.validate()?;
        Ok(Self {
            features: VecDeque::with_capacity(config.feature_limit + 1),
            flows: VecDeque::with_capacity(config.flow_limit + 1),
            config,
        })
    }

    pub fn with_defaults() -> Self {
        let config = StoreConfig::default();
        Self {
            features: VecDeque::with_capacity(config.feature_limit + 1),
            flows: VecDeque::with_capacity(config.flow_limit + 1),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Flow count including any not yet pruned.
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Prepend a feature, evicting the oldest when over capacity.
    pub fn push_feature(&mut self, feature: Feature) {
        self.features.push_front(feature);
        while self.features.len() > self.config.feature_limit {
            if let Some(evicted) = self.features.pop_back() {
                trace!(feature_id = %evicted.id, "Evicted oldest feature");
            }
        }
    }

    /// Append a flow, evicting the oldest when over capacity.
    pub fn push_flow(&mut self, flow: Flow) {
        self.flows.push_back(flow);
        while self.flows.len() > self.config.flow_limit {
            if let Some(evicted) = self.flows.pop_front() {
                trace!(flow_id = %evicted.id, "Evicted oldest flow");
            }
        }
    }

    /// Remove every flow with `expires_at <= now`. Returns how many were
    /// removed.
    pub fn prune_expired_flows(&mut self, now: Timestamp) -> usize {
        let before = self.flows.len();
        self.flows.retain(|flow| !flow.is_expired(now));
        let removed = before - self.flows.len();
        if removed > 0 {
            debug!(removed, remaining = self.flows.len(), "Pruned expired flows");
        }
        removed
    }

    /// Prune, then copy both buffers.
    pub fn snapshot(&mut self, now: Timestamp) -> StoreSnapshot {
        self.prune_expired_flows(now);
        StoreSnapshot {
            features: self.features.iter().cloned().collect(),
            flows: self.flows.iter().cloned().collect(),
        }
    }

    /// Prune, then copy the live flows.
    pub fn current_flows(&mut self, now: Timestamp) -> Vec<Flow> {
        self.prune_expired_flows(now);
        self.flows.iter().cloned().collect()
    }

    /// Copy of the feature buffer, newest first.
    pub fn features(&self) -> Vec<Feature> {
        self.features.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.features.clear();
        self.flows.clear();
    }
}

impl Default for BoundedEventStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EventSink for BoundedEventStore {
    fn push_feature(&mut self, feature: Feature) {
        BoundedEventStore::push_feature(self, feature);
    }

    fn push_flow(&mut self, flow: Flow) {
        BoundedEventStore::push_flow(self, flow);
    }

    fn flow_ttl_ms(&self) -> u64 {
        self.config.flow_ttl_ms
    }
}

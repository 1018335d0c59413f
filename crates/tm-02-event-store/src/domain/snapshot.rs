//! Owned view of the store contents.

use serde::{Deserialize, Serialize};
use shared_types::{Feature, Flow};

/// Copy of both buffers at one instant.
///
/// `features` is newest-first, `flows` is oldest-first, matching the
/// backing buffers. Mutating a snapshot never affects the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub features: Vec<Feature>,
    pub flows: Vec<Flow>,
}

impl StoreSnapshot {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.flows.is_empty()
    }
}

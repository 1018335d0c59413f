//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tm_02_event_store::StoreConfig;

use crate::error::DispatchError;

/// Recognized options, under their literal names.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    #[serde(rename = "FEATURE_LIMIT")]
    pub feature_limit: usize,

    #[serde(rename = "FLOW_LIMIT")]
    pub flow_limit: usize,

    /// Milliseconds.
    #[serde(rename = "FLOW_TTL")]
    pub flow_ttl_ms: u64,

    #[serde(rename = "BROADCAST_INTERVAL_MS")]
    pub broadcast_interval_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            feature_limit: store.feature_limit,
            flow_limit: store.flow_limit,
            flow_ttl_ms: store.flow_ttl_ms,
            broadcast_interval_ms: 1_500,
        }
    }
}

impl DispatchConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            feature_limit: self.feature_limit,
            flow_limit: self.flow_limit,
            flow_ttl_ms: self.flow_ttl_ms,
        }
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        self.store_config().validate()?;
        if self.broadcast_interval_ms == 0 {
            return Err(DispatchError::ZeroInterval);
        }
        Ok(())
    }
}

//! Store capacity and TTL configuration.

use serde::{Deserialize, Serialize};

use crate::error::StoreConfigError;

pub const DEFAULT_FEATURE_LIMIT: usize = 120;
pub const DEFAULT_FLOW_LIMIT: usize = 60;
pub const DEFAULT_FLOW_TTL_MS: u64 = 8_000;

/// Capacity and expiry settings for `BoundedEventStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of retained features.
    pub feature_limit: usize,
    /// Maximum number of retained flows.
    pub flow_limit: usize,
    /// Flow time-to-live in milliseconds.
    pub flow_ttl_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            feature_limit: DEFAULT_FEATURE_LIMIT,
            flow_limit: DEFAULT_FLOW_LIMIT,
            flow_ttl_ms: DEFAULT_FLOW_TTL_MS,
        }
    }
}

impl StoreConfig {
    /// Small limits for tests.
    pub fn for_testing() -> Self {
        Self {
            feature_limit: 4,
            flow_limit: 2,
            flow_ttl_ms: 1_000,
        }
    }

    pub fn validate(&self) -> Result<(), StoreConfigError> {
        if self.feature_limit == 0 {
            return Err(StoreConfigError::ZeroCapacity {
                name: "FEATURE_LIMIT",
            });
        }
        if self.flow_limit == 0 {
            return Err(StoreConfigError::ZeroCapacity { name: "FLOW_LIMIT" });
        }
        if self.flow_ttl_ms == 0 {
            return Err(StoreConfigError::ZeroTtl);
        }
        Ok(())
    }
}

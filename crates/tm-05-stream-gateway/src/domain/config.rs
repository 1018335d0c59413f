//! Gateway configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default per-connection stream interval.
pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 3_000;

/// Default maximum inbound frame size (64 KiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Default per-connection live-feed buffer.
pub const DEFAULT_LIVE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind host
    pub host: String,
    /// Bind port (0 picks an ephemeral port)
    pub port: u16,
    /// Interval between `update` frames on `/ws` and `/sse`
    pub stream_interval_ms: u64,
    /// Inbound frames larger than this are dropped
    pub max_message_size: usize,
    /// Frames buffered per `/ws/live` connection before the oldest is dropped
    pub live_channel_capacity: usize,
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            stream_interval_ms: DEFAULT_STREAM_INTERVAL_MS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            live_channel_capacity: DEFAULT_LIVE_CAPACITY,
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Loopback, ephemeral port, fast interval.
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            stream_interval_ms: 50,
            ..Default::default()
        }
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host cannot be empty".into()));
        }
        if self.stream_interval_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "stream_interval_ms cannot be 0".into(),
            ));
        }
        if self.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }
        if self.live_channel_capacity == 0 {
            return Err(ConfigError::InvalidLimit(
                "live_channel_capacity cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Origins allowed to connect; `*` allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid interval value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8787);
        assert_eq!(config.stream_interval(), Duration::from_secs(3));
        assert_eq!(config.max_message_size, 65_536);
        assert_eq!(config.live_channel_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = GatewayConfig {
            stream_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout(_))
        ));

        let config = GatewayConfig {
            live_channel_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLimit(_))));

        let config = GatewayConfig {
            host: " ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json() {
        let config: GatewayConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.stream_interval_ms, DEFAULT_STREAM_INTERVAL_MS);
        assert!(config.cors.enabled);
    }
}

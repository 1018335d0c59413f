//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// WebSocket close code for a normal, intentional closure.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Fixed retry delay of the reduced ("basic") configuration.
pub const BASIC_RETRY_DELAY_MS: u64 = 5_000;

/// Recognized options, under their literal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub url: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub auth_token: Option<String>,
    /// Base reconnect delay in milliseconds.
    pub reconnect_delay: u64,
    /// Reconnect delay ceiling in milliseconds.
    pub max_reconnect_delay: u64,
    pub max_reconnect_attempts: u32,
    /// Milliseconds between pings. 0 disables the heartbeat.
    pub heartbeat_interval: u64,
    /// Outbound queue bound. 0 disables queueing.
    pub max_queue_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8787/ws".to_string(),
            auth_token: None,
            reconnect_delay: 1_000,
            max_reconnect_delay: 30_000,
            max_reconnect_attempts: 10,
            heartbeat_interval: 30_000,
            max_queue_size: 100,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Fixed 5 s retry forever, no heartbeat, no queue.
    pub fn basic(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            reconnect_delay: BASIC_RETRY_DELAY_MS,
            max_reconnect_delay: BASIC_RETRY_DELAY_MS,
            max_reconnect_attempts: u32::MAX,
            heartbeat_interval: 0,
            max_queue_size: 0,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// `None` when the heartbeat is disabled.
    pub fn heartbeat(&self) -> Option<Duration> {
        (self.heartbeat_interval > 0).then(|| Duration::from_millis(self.heartbeat_interval))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.reconnect_delay == 0 {
            return Err(ConfigError::Invalid("reconnectDelay cannot be 0".into()));
        }
        if self.max_reconnect_delay < self.reconnect_delay {
            return Err(ConfigError::Invalid(
                "maxReconnectDelay cannot be below reconnectDelay".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("URL must use ws:// or wss://, got {0:?}")]
    InvalidUrl(String),

    #[error("Invalid client configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.reconnect_delay, 1_000);
        assert_eq!(config.max_reconnect_attempts, 10);
        assert_eq!(config.heartbeat(), Some(Duration::from_secs(30)));
        assert_eq!(config.max_queue_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_literal_option_names() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"url":"ws://h/ws","reconnectDelay":250,"maxReconnectAttempts":3,"heartbeatInterval":0,"maxQueueSize":5,"authToken":"t"}"#,
        )
        .unwrap();
        assert_eq!(config.reconnect_delay, 250);
        assert_eq!(config.max_reconnect_attempts, 3);
        assert_eq!(config.heartbeat(), None);
        assert_eq!(config.max_queue_size, 5);
        assert_eq!(config.auth_token.as_deref(), Some("t"));
        assert_eq!(config.max_reconnect_delay, 30_000);
    }

    #[test]
    fn test_basic_is_reduced_configuration() {
        let config = ClientConfig::basic("ws://h/ws");
        assert_eq!(config.reconnect_delay, config.max_reconnect_delay);
        assert_eq!(config.heartbeat(), None);
        assert_eq!(config.max_queue_size, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            ClientConfig::new("http://h").validate(),
            Err(ConfigError::InvalidUrl(_))
        ));
        let config = ClientConfig {
            max_reconnect_delay: 10,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

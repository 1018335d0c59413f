//! Exponential reconnect backoff.

use std::time::Duration;

use crate::domain::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    ceiling: Duration,
    max_attempts: u32,
}

impl BackoffPolicy {
    pub fn new(base: Duration, ceiling: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            ceiling: ceiling.max(base),
            max_attempts,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reconnect_delay),
            Duration::from_millis(config.max_reconnect_delay),
            config.max_reconnect_attempts,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the 1-based `attempt`: `base × 2^(attempt-1)`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base.saturating_mul(1u32 << exponent).min(self.ceiling)
    }

    /// Whether `attempt` (1-based) is still within budget.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::new(Duration::from_millis(1_000), Duration::from_millis(30_000), 10)
    }

    #[test]
    fn test_doubles_from_base() {
        let p = policy();
        assert_eq!(p.delay_for(1), Duration::from_millis(1_000));
        assert_eq!(p.delay_for(2), Duration::from_millis(2_000));
        assert_eq!(p.delay_for(3), Duration::from_millis(4_000));
        assert_eq!(p.delay_for(5), Duration::from_millis(16_000));
    }

    #[test]
    fn test_capped_at_ceiling() {
        let p = policy();
        assert_eq!(p.delay_for(6), Duration::from_millis(30_000));
        assert_eq!(p.delay_for(u32::MAX), Duration::from_millis(30_000));
    }

    #[test]
    fn test_attempt_budget() {
        let p = policy();
        assert!(p.allows(10));
        assert!(!p.allows(11));
    }

    #[test]
    fn test_basic_is_fixed() {
        let p = BackoffPolicy::from_config(&ClientConfig::basic("ws://h"));
        assert_eq!(p.delay_for(1), p.delay_for(20));
    }
}

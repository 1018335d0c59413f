//! Weighted severity sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};
use shared_types::Severity;

/// Relative weights for each severity. Only ratios matter; the sampling
/// range is the sum of all weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SeverityWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            critical: 6,
            high: 20,
            medium: 34,
            low: 40,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> u64 {
        Severity::ALL.iter().map(|s| u64::from(self.weight(*s))).sum()
    }

    /// Cumulative-sum draw. All-zero weights always yield `Low`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Severity {
        let total = self.total();
        if total == 0 {
            return Severity::Low;
        }

        let mut roll = rng.gen_range(0..total);
        for severity in Severity::ALL {
            let weight = u64::from(self.weight(severity));
            if roll < weight {
                return severity;
            }
            roll -= weight;
        }
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_frequencies_match_weights() {
        let weights = SeverityWeights::default();
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let draws = 100_000;

        let mut counts: HashMap<Severity, u64> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(weights.sample(&mut rng)).or_default() += 1;
        }

        for severity in Severity::ALL {
            let expected = f64::from(weights.weight(severity)) / weights.total() as f64;
            let observed = counts.get(&severity).copied().unwrap_or(0) as f64 / draws as f64;
            let relative_error = (observed - expected).abs() / expected;
            assert!(
                relative_error < 0.05,
                "{severity}: expected {expected:.4}, observed {observed:.4}"
            );
        }
    }

    #[test]
    fn test_single_nonzero_weight_always_wins() {
        let weights = SeverityWeights {
            critical: 0,
            high: 0,
            medium: 7,
            low: 0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..500).all(|_| weights.sample(&mut rng) == Severity::Medium));
    }

    #[test]
    fn test_zero_weights_fall_back_to_low() {
        let weights = SeverityWeights {
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
        };
        assert_eq!(weights.sample(&mut StdRng::seed_from_u64(1)), Severity::Low);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let weights: SeverityWeights = serde_json::from_str(r#"{"Critical": 50}"#).unwrap();
        assert_eq!(weights.critical, 50);
        assert_eq!(weights.low, 40);
    }
}

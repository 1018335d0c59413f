//! Fixed source/destination pairs for per-connection streams.

use chrono::{DateTime, Utc};
use rand::Rng;
use shared_types::{AttackEvent, AttackType, GeoPoint};
use std::sync::Arc;
use tm_01_region_catalog::CategoryTable;
use uuid::Builder;

/// A plausible attacker/target pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackPair {
    pub source: (&'static str, f64, f64),
    pub destination: (&'static str, f64, f64),
}

const fn pair(source: (&'static str, f64, f64), destination: (&'static str, f64, f64)) -> AttackPair {
    AttackPair {
        source,
        destination,
    }
}

const BEIJING: (&str, f64, f64) = ("Beijing", 39.9042, 116.4074);
const MOSCOW: (&str, f64, f64) = ("Moscow", 55.7558, 37.6173);
const SAO_PAULO: (&str, f64, f64) = ("Sao Paulo", -23.5505, -46.6333);
const LAGOS: (&str, f64, f64) = ("Lagos", 6.5244, 3.3792);
const NEW_YORK: (&str, f64, f64) = ("New York", 40.7128, -74.0060);
const SAN_FRANCISCO: (&str, f64, f64) = ("San Francisco", 37.7749, -122.4194);
const LONDON: (&str, f64, f64) = ("London", 51.5074, -0.1278);
const FRANKFURT: (&str, f64, f64) = ("Frankfurt", 50.1109, 8.6821);
const TOKYO: (&str, f64, f64) = ("Tokyo", 35.6762, 139.6503);
const SYDNEY: (&str, f64, f64) = ("Sydney", -33.8688, 151.2093);

pub const ATTACK_PAIRS: &[AttackPair] = &[
    pair(BEIJING, SAN_FRANCISCO),
    pair(MOSCOW, NEW_YORK),
    pair(MOSCOW, LONDON),
    pair(SAO_PAULO, FRANKFURT),
    pair(LAGOS, LONDON),
    pair(BEIJING, TOKYO),
    pair(FRANKFURT, SYDNEY),
    pair(NEW_YORK, FRANKFURT),
];

fn geo((name, lat, lon): (&str, f64, f64)) -> GeoPoint {
    GeoPoint::new(name, lat, lon)
}

/// Deterministic first event of every session.
pub fn welcome_event(now: DateTime<Utc>) -> AttackEvent {
    AttackEvent {
        id: "welcome".to_string(),
        source: geo(BEIJING),
        destination: geo(SAN_FRANCISCO),
        attack_type: AttackType {
            name: "DDoS".to_string(),
            color: "#ef4444".to_string(),
        },
        timestamp: now,
    }
}

/// Per-connection generator over `ATTACK_PAIRS`.
pub struct PairSynthesizer<R: Rng> {
    categories: Arc<CategoryTable>,
    rng: R,
}

impl<R: Rng> PairSynthesizer<R> {
    pub fn new(categories: Arc<CategoryTable>, rng: R) -> Self {
        Self { categories, rng }
    }

    pub fn next_event(&mut self, now: DateTime<Utc>) -> AttackEvent {
        let pair = ATTACK_PAIRS[self.rng.gen_range(0..ATTACK_PAIRS.len())];
        let category = self.categories.pick(&mut self.rng);
        let id = Builder::from_random_bytes(self.rng.gen()).into_uuid();

        AttackEvent {
            id: id.to_string(),
            source: geo(pair.source),
            destination: geo(pair.destination),
            attack_type: AttackType {
                name: category.label,
                color: category.color_token,
            },
            timestamp: now,
        }
    }
}

//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Reference data**: `Region`, `Category`, `Severity`
//! - **Observations**: `Feature` (one endpoint of an attack)
//! - **Edges**: `Flow` (directed link between two features, with a TTL)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

use crate::time::Timestamp;

// =============================================================================
// CLUSTER A: REFERENCE DATA
// =============================================================================

/// A named geographic point.
///
/// Loaded once at startup and never mutated. Entries with invalid
/// coordinates are filtered out by the catalog before synthesis sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

impl Region {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            city: city.into(),
            lat,
            lon,
        }
    }

    /// True when the name is non-blank and both coordinates are finite and
    /// inside `[-90, 90]` / `[-180, 180]`.
    pub fn has_valid_coordinates(&self) -> bool {
        !self.name.trim().is_empty()
            && self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Attack category with the colour token the UI renders it with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    #[serde(rename = "colorToken")]
    pub color_token: String,
}

impl Category {
    pub fn new(label: impl Into<String>, color_token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color_token: color_token.into(),
        }
    }
}

/// Attack severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities in sampling-table order.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a feature plays in an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Source,
    Destination,
    Observation,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Source => "source",
            Direction::Destination => "destination",
            Direction::Observation => "observation",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER B: OBSERVATIONS
// =============================================================================

/// Identifier of a feature inside the event store.
pub type FeatureId = String;

/// Identifier of a flow inside the event store.
pub type FlowId = String;

/// A point-in-time observation placed on the map.
///
/// Created by the synthesizer, owned by the event store until evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: FeatureId,
    #[serde(rename = "syntheticIP")]
    pub synthetic_ip: Ipv4Addr,
    pub region: Region,
    pub severity: Severity,
    pub category: Category,
    pub timestamp: Timestamp,
    pub direction: Direction,
}

// =============================================================================
// CLUSTER C: EDGES
// =============================================================================

/// One end of a flow: a reference to the feature plus the geographic data
/// needed to draw the edge without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEndpoint {
    pub feature_id: FeatureId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Feature> for FlowEndpoint {
    fn from(feature: &Feature) -> Self {
        Self {
            feature_id: feature.id.clone(),
            name: feature.region.name.clone(),
            lat: feature.region.lat,
            lon: feature.region.lon,
        }
    }
}

/// A directed edge between two features representing one synthesized attack.
///
/// ## Invariant
///
/// `expires_at >= created_at`; `Flow::new` is the only constructor used by
/// the pipeline and saturates instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub id: FlowId,
    pub src: FlowEndpoint,
    pub dst: FlowEndpoint,
    pub severity: Severity,
    pub category: Category,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Flow {
    /// Build a flow linking `source` to `destination`, expiring `ttl_ms`
    /// after `created_at`.
    pub fn new(
        id: impl Into<FlowId>,
        source: &Feature,
        destination: &Feature,
        created_at: Timestamp,
        ttl_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            src: FlowEndpoint::from(source),
            dst: FlowEndpoint::from(destination),
            severity: source.severity,
            category: source.category.clone(),
            created_at,
            expires_at: created_at.saturating_add(ttl_ms),
        }
    }

    /// A flow is expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Time to live that was applied at creation.
    pub fn ttl(&self) -> u64 {
        self.expires_at.saturating_sub(self.created_at)
    }
}

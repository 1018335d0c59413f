//! Validated, immutable region catalog.

use shared_types::Region;
use std::path::Path;
use tracing::{debug, warn};

use crate::domain::builtin::builtin_regions;
use crate::error::CatalogError;

/// Minimum number of regions required to synthesize an attack (one source,
/// one distinct destination).
pub const MIN_SYNTHESIS_REGIONS: usize = 2;

/// The region table used by the synthesizer.
///
/// Construction filters invalid entries, so every region reachable through
/// this type satisfies `Region::has_valid_coordinates`.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    rejected: usize,
}

impl RegionCatalog {
    /// Build a catalog, dropping regions with invalid coordinates.
    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut rejected = 0;
        let regions: Vec<Region> = regions
            .into_iter()
            .filter(|region| {
                let valid = region.has_valid_coordinates();
                if !valid {
                    rejected += 1;
                    warn!(
                        name = %region.name,
                        lat = region.lat,
                        lon = region.lon,
                        "Dropping region with invalid coordinates"
                    );
                }
                valid
            })
            .collect();

        debug!(accepted = regions.len(), rejected, "Region catalog loaded");

        Self { regions, rejected }
    }

    /// The built-in world catalog.
    pub fn builtin() -> Self {
        Self::from_regions(builtin_regions())
    }

    /// Parse a JSON array of regions.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let regions: Vec<Region> = serde_json::from_str(json)?;
        Ok(Self::from_regions(regions))
    }

    /// Load a JSON array of regions from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of entries dropped at load time.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Whether the catalog holds enough regions for synthesis.
    pub fn supports_synthesis(&self) -> bool {
        self.regions.len() >= MIN_SYNTHESIS_REGIONS
    }
}

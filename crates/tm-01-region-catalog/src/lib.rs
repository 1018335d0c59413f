//! # TM-01 Region Catalog
//!
//! Leaf dependency of the synthesis pipeline: the immutable table of named
//! geographic points and the attack category table.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data, no I/O beyond optional JSON load
//!   - `RegionCatalog`: validated, immutable region list
//!   - `CategoryTable`: attack categories with a fallback entry
//!   - `builtin`: default world catalog and category set
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: Every region in a `RegionCatalog` has a non-blank name
//!   and finite coordinates within `[-90, 90]` × `[-180, 180]`.
//! - **INVARIANT-2**: `CategoryTable::pick` always yields a category; an empty table
//!   yields the fallback category.
//!
//! ## Usage Example
//!
//! ```ignore
//! use tm_01_region_catalog::RegionCatalog;
//!
//! let catalog = RegionCatalog::builtin();
//! assert!(catalog.supports_synthesis());
//!
//! let custom = RegionCatalog::load_json("regions.json")?;
//! ```

pub mod domain;
pub mod error;

pub use domain::builtin::{builtin_categories, builtin_regions};
pub use domain::catalog::{RegionCatalog, MIN_SYNTHESIS_REGIONS};
pub use domain::categories::{CategoryTable, FALLBACK_CATEGORY_COLOR, FALLBACK_CATEGORY_LABEL};
pub use error::CatalogError;

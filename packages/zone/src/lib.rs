#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone boundary loading and per-zone accident risk aggregation.
//!
//! Boundary documents are `GeoJSON` `FeatureCollection`s, one per
//! administrative level. Every pass re-attributes the full report set to
//! the zones and classifies each zone into a [`RiskTier`]; nothing carries
//! over between passes.
//!
//! [`RiskTier`]: hazard_map_incident_models::RiskTier

pub mod aggregate;
pub mod boundaries;
pub mod classify;

use geo::Geometry;
use hazard_map_zone_models::ZoneLevel;
use thiserror::Error;

pub use aggregate::{ZoneKey, ZoneRiskMap, aggregate};

/// Errors that can occur while loading zone boundaries.
///
/// These never escape [`boundaries::load_dataset`]: a dataset that fails
/// to load contributes no zones.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but has the wrong shape.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// A named zone polygon, immutable once loaded.
#[derive(Debug, Clone)]
pub struct ZoneFeature {
    /// Zone name.
    pub name: String,
    /// Enclosing region name; empty when the dataset has none.
    pub parent_region: String,
    /// Administrative level.
    pub level: ZoneLevel,
    /// Polygon or multi-polygon boundary. `None` when the feature's
    /// geometry could not be read; such a zone never contains a report.
    pub geometry: Option<Geometry<f64>>,
}

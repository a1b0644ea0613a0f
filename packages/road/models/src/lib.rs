#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road segment and road query types.
//!
//! [`RoadGeometry`] is what the geodata service returns; [`RoadSegment`] is
//! the same way after a risk has been assigned to it. The way `id` is the
//! join key against externally supplied [`ScoreOverride`]s.

use hazard_map_incident_models::RiskTier;
use serde::{Deserialize, Serialize};

/// Geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude.
    pub south: f64,
    /// Western longitude.
    pub west: f64,
    /// Northern latitude.
    pub north: f64,
    /// Eastern longitude.
    pub east: f64,
}

/// Configuration for the road geometry query, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadQueryConfig {
    /// Overpass interpreter endpoints, tried in order.
    pub mirrors: Vec<String>,
    /// Region to fetch roads for.
    pub bbox: BoundingBox,
    /// Server-side query timeout. The client waits a few seconds longer
    /// per attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `highway=*` values to include.
    #[serde(default = "default_highway_classes")]
    pub highway_classes: Vec<String>,
    /// Name fragments marking a road as high risk.
    #[serde(default)]
    pub high_risk_keywords: Vec<String>,
    /// Name fragments marking a road as moderate risk.
    #[serde(default)]
    pub moderate_risk_keywords: Vec<String>,
}

const fn default_timeout_secs() -> u64 {
    25
}

fn default_highway_classes() -> Vec<String> {
    [
        "motorway",
        "trunk",
        "primary",
        "secondary",
        "tertiary",
        "residential",
        "unclassified",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// A road way as returned by the geodata service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadGeometry {
    /// Stable external way identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Ordered `(lat, lon)` points; always at least two.
    pub coordinates: Vec<(f64, f64)>,
}

/// Risk assigned to one road segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadRisk {
    /// Classified tier.
    pub risk_tier: RiskTier,
    /// Score in `[0, 100]`.
    pub risk_score: f64,
    /// Number of accidents attributed to the road.
    pub accident_count: u32,
}

/// A road segment with its assigned risk, ready for styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadSegment {
    /// Stable external way identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Ordered `(lat, lon)` points.
    pub coordinates: Vec<(f64, f64)>,
    /// Classified tier.
    pub risk_tier: RiskTier,
    /// Score in `[0, 100]`.
    pub risk_score: f64,
    /// Number of accidents attributed to the road.
    pub accident_count: u32,
}

impl RoadSegment {
    /// Combines a fetched way with its assigned risk.
    #[must_use]
    pub fn new(geometry: RoadGeometry, risk: RoadRisk) -> Self {
        Self {
            id: geometry.id,
            name: geometry.name,
            coordinates: geometry.coordinates,
            risk_tier: risk.risk_tier,
            risk_score: risk.risk_score,
            accident_count: risk.accident_count,
        }
    }
}

/// An externally supplied risk score for one road segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOverride {
    /// Way identifier the score applies to.
    pub segment_id: i64,
    /// Score in `[0, 100]`.
    pub risk_score: f64,
    /// Accident count, when the classifier provides one.
    #[serde(default)]
    pub accident_count: Option<u32>,
}

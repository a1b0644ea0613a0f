#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative zone types.
//!
//! Defines the TOML schema for zone boundary datasets and the risk record
//! produced for every zone on each aggregation pass.

use hazard_map_incident_models::{RiskTier, Severity};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative level of a zone dataset.
///
/// The level selects which threshold table classifies the zone.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneLevel {
    /// Village-level subdivision.
    Barangay,
    /// Municipality or city; aggregates many barangays.
    Municipality,
}

/// A zone boundary dataset, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDataset {
    /// Unique dataset identifier (e.g., `"barangays"`).
    pub id: String,
    /// Administrative level of every zone in the dataset.
    pub level: ZoneLevel,
    /// Where the `GeoJSON` `FeatureCollection` lives.
    pub source: ZoneSourceConfig,
    /// Feature property holding the zone name (e.g., `"NAME_3"`).
    pub name_property: String,
    /// Feature property holding the parent region name (e.g., `"NAME_2"`).
    pub parent_property: String,
}

/// How to retrieve a zone boundary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneSourceConfig {
    /// A `GeoJSON` file on the local filesystem.
    File {
        /// Path to the file.
        path: String,
    },
    /// A URL returning a `GeoJSON` `FeatureCollection`.
    Url {
        /// Full URL.
        url: String,
    },
}

/// Per-severity report tallies for one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Critical reports.
    pub critical: u32,
    /// High-severity reports.
    pub high: u32,
    /// Moderate reports.
    pub moderate: u32,
    /// Minor reports.
    pub minor: u32,
}

impl SeverityCounts {
    /// Adds one report of the given severity.
    ///
    /// Returns `false` (and counts nothing) for [`Severity::Unknown`].
    pub const fn record(&mut self, severity: Severity) -> bool {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Minor => self.minor += 1,
            Severity::Unknown => return false,
        }
        true
    }

    /// Total of all four tallies.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.critical + self.high + self.moderate + self.minor
    }
}

/// Aggregated risk for one zone.
///
/// Produced fresh on every aggregation pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRiskRecord {
    /// Zone name, unique within one pass.
    pub zone_name: String,
    /// Name of the enclosing region (municipality or province).
    pub parent_region: String,
    /// Administrative level the record was classified at.
    pub level: ZoneLevel,
    /// Number of reports attributed to the zone.
    pub total_count: u32,
    /// Breakdown of `total_count` by severity.
    pub counts_by_severity: SeverityCounts,
    /// Classified tier.
    pub risk_tier: RiskTier,
    /// Human-readable summary.
    pub description: String,
}

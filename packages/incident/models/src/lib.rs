#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident report, severity, and risk tier types.
//!
//! These are the shared vocabulary of the hazard-map engine. Reports are
//! owned by the persistence layer and only ever read here; tiers are the
//! discrete output of every risk classification (zones and roads alike).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Reported severity of a single accident.
///
/// Parsing is case-insensitive. Anything that is not one of the four known
/// labels, including `null`, numbers, and other non-string values, becomes
/// [`Severity::Unknown`] rather than failing the whole report batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    /// Severity missing or not recognised.
    Unknown,
    /// Property damage only.
    Minor,
    /// Non-life-threatening injuries.
    Moderate,
    /// Serious injuries.
    High,
    /// Fatalities or life-threatening injuries.
    Critical,
}

impl Severity {
    /// Parses a severity label, mapping unrecognised input to
    /// [`Severity::Unknown`].
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        Self::from_str(value.trim()).unwrap_or(Self::Unknown)
    }

    /// Returns the four known severities, most severe first.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        &[Self::Critical, Self::High, Self::Moderate, Self::Minor]
    }
}

/// Wire form of a severity: a label, or any other JSON value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeverity {
    Label(String),
    Other(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawSeverity::deserialize(deserializer)? {
            RawSeverity::Label(label) => Self::parse_lenient(&label),
            RawSeverity::Other(_) => Self::Unknown,
        })
    }
}

/// A point-located accident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Reported severity.
    #[serde(default = "unknown_severity")]
    pub severity: Severity,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
}

const fn unknown_severity() -> Severity {
    Severity::Unknown
}

/// Discrete risk classification shared by zones and road segments.
///
/// Ordered from least to most severe so tiers compare naturally.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTier {
    /// No recorded risk.
    #[default]
    Low,
    /// Isolated incidents.
    Minor,
    /// Recurring or moderately severe incidents.
    Moderate,
    /// Frequent or serious incidents.
    High,
    /// Hotspot.
    Critical,
}

impl RiskTier {
    /// Returns all tiers, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Low,
            Self::Minor,
            Self::Moderate,
            Self::High,
            Self::Critical,
        ]
    }

    /// Returns the capitalised label used in human-readable descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// A single weighted point for the heatmap overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatSample {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Weight in `[0, 1]`.
    pub intensity: f64,
}

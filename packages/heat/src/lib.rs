#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Heatmap intensities for accident reports.
//!
//! Each report becomes one sample weighted by severity. Reports younger
//! than [`RECENT_WINDOW_DAYS`] get a single multiplicative boost; there is
//! no further decay.

use chrono::{DateTime, Duration, Utc};
use hazard_map_incident_models::{HeatSample, Report, Severity};

/// Reports younger than this many days are boosted.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Multiplier applied to recent reports before clamping.
pub const RECENT_BOOST: f64 = 1.3;

/// Upper bound of any intensity.
pub const MAX_INTENSITY: f64 = 1.0;

/// Base intensity for a severity before any recency boost.
#[must_use]
pub const fn base_intensity(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 1.0,
        Severity::High => 0.8,
        Severity::Moderate => 0.5,
        Severity::Minor | Severity::Unknown => 0.3,
    }
}

/// Intensity of a single report as seen at `now`.
#[must_use]
pub fn intensity(report: &Report, now: DateTime<Utc>) -> f64 {
    let base = base_intensity(report.severity);
    if now.signed_duration_since(report.created_at) < Duration::days(RECENT_WINDOW_DAYS) {
        (base * RECENT_BOOST).min(MAX_INTENSITY)
    } else {
        base
    }
}

/// Computes one heat sample per report, in input order.
#[must_use]
pub fn compute_intensity(reports: &[Report], now: DateTime<Utc>) -> Vec<HeatSample> {
    let samples: Vec<HeatSample> = reports
        .iter()
        .map(|report| HeatSample {
            latitude: report.latitude,
            longitude: report.longitude,
            intensity: intensity(report, now),
        })
        .collect();

    log::debug!("Computed {} heat sample(s)", samples.len());
    samples
}

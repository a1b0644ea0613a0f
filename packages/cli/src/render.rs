//! Builds the overlay documents printed by the CLI.
//!
//! Each document is plain JSON that a map renderer can consume directly:
//! styled zone records, styled road segments, and heat triples.

use std::path::Path;

use chrono::Utc;
use hazard_map_incident_models::Report;
use hazard_map_overlay::style::{heat_triples, style_roads, style_zones};
use hazard_map_overlay::{EngineConfig, ReportOverlays, RoadLayer};
use hazard_map_road::{OverrideTable, RoadFetcher, RoadRiskAssigner};
use hazard_map_road_models::ScoreOverride;
use hazard_map_zone::ZoneFeature;
use serde_json::json;

/// Reads a JSON array of reports.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a report array.
pub fn read_reports(path: &Path) -> Result<Vec<Report>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let reports: Vec<Report> = serde_json::from_str(&text)?;
    log::info!("Read {} report(s) from {}", reports.len(), path.display());
    Ok(reports)
}

/// Reads a JSON array of road score overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not an override array.
pub fn read_overrides(path: &Path) -> Result<Vec<ScoreOverride>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let overrides: Vec<ScoreOverride> = serde_json::from_str(&text)?;
    log::info!(
        "Read {} score override(s) from {}",
        overrides.len(),
        path.display()
    );
    Ok(overrides)
}

/// Loads every configured zone dataset. Unavailable datasets contribute
/// no zones.
pub async fn load_zones(client: &reqwest::Client, config: &EngineConfig) -> Vec<ZoneFeature> {
    hazard_map_zone::boundaries::load_all(client, &config.zones).await
}

/// Builds the road layer, consulting `overrides` before the heuristic.
#[must_use]
pub fn road_layer(
    client: reqwest::Client,
    config: &EngineConfig,
    overrides: Option<Vec<ScoreOverride>>,
) -> RoadLayer {
    let mut assigner = RoadRiskAssigner::heuristic(&config.road);
    if let Some(overrides) = overrides {
        assigner = assigner.with_overrides(Box::new(OverrideTable::new(overrides)));
    }
    RoadLayer::new(RoadFetcher::over_http(config.road.clone(), client), assigner)
}

/// Zone overlay document.
#[must_use]
pub fn zones_document(reports: &[Report], zones: &[ZoneFeature]) -> serde_json::Value {
    let records = hazard_map_zone::aggregate(reports, zones);
    json!({ "zones": style_zones(records.values()) })
}

/// Heat overlay document.
#[must_use]
pub fn heat_document(reports: &[Report]) -> serde_json::Value {
    let samples = hazard_map_heat::compute_intensity(reports, Utc::now());
    json!({ "heat": heat_triples(&samples) })
}

/// Road overlay document, including the layer status.
pub async fn roads_document(layer: &RoadLayer) -> serde_json::Value {
    layer.load().await;
    let segments = layer.segments().unwrap_or_default();
    json!({
        "roads": style_roads(segments.iter()),
        "status": layer.status(),
    })
}

/// All three overlays in one document.
///
/// A road fetch failure does not fail the document; it shows up in
/// `roadStatus.error` and `roads` is empty.
pub async fn full_document(
    reports: &[Report],
    zones: &[ZoneFeature],
    layer: &RoadLayer,
) -> serde_json::Value {
    let overlays = ReportOverlays::new();
    overlays.recompute(reports, zones, Utc::now());
    let snapshot = overlays.current().unwrap_or_default();

    layer.load().await;
    let segments = layer.segments().unwrap_or_default();

    json!({
        "zones": style_zones(snapshot.zones.values()),
        "heat": heat_triples(&snapshot.heat),
        "roads": style_roads(segments.iter()),
        "roadStatus": layer.status(),
    })
}

//! Zone boundary document loading.
//!
//! Boundary documents are fetched once per session. A missing or malformed
//! document is not fatal: the dataset simply contributes no zones and the
//! zone overlay renders nothing for it.

use geo::Geometry;
use geojson::GeoJson;
use hazard_map_zone_models::{ZoneDataset, ZoneSourceConfig};

use crate::{ZoneError, ZoneFeature};

/// Loads every zone of a dataset.
///
/// Never fails. Load and parse errors are logged and yield an empty list.
pub async fn load_dataset(client: &reqwest::Client, dataset: &ZoneDataset) -> Vec<ZoneFeature> {
    let document = match fetch_document(client, &dataset.source).await {
        Ok(document) => document,
        Err(e) => {
            log::warn!("Zone dataset '{}' unavailable: {e}", dataset.id);
            return Vec::new();
        }
    };

    match parse_features(&document, dataset) {
        Ok(features) => {
            log::info!(
                "Loaded {} zone(s) from dataset '{}'",
                features.len(),
                dataset.id
            );
            features
        }
        Err(e) => {
            log::warn!("Zone dataset '{}' is malformed: {e}", dataset.id);
            Vec::new()
        }
    }
}

/// Loads several datasets in order and concatenates their zones.
pub async fn load_all(client: &reqwest::Client, datasets: &[ZoneDataset]) -> Vec<ZoneFeature> {
    let mut zones = Vec::new();
    for dataset in datasets {
        zones.extend(load_dataset(client, dataset).await);
    }
    zones
}

/// Retrieves the raw `GeoJSON` text for a dataset source.
///
/// # Errors
///
/// Returns [`ZoneError`] if the file cannot be read, the request fails, or
/// the server responds with a non-success status.
pub async fn fetch_document(
    client: &reqwest::Client,
    source: &ZoneSourceConfig,
) -> Result<String, ZoneError> {
    match source {
        ZoneSourceConfig::File { path } => Ok(tokio::fs::read_to_string(path).await?),
        ZoneSourceConfig::Url { url } => {
            let resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(ZoneError::Conversion {
                    message: format!("Boundary request failed with status {}", resp.status()),
                });
            }
            Ok(resp.text().await?)
        }
    }
}

/// Parses a `GeoJSON` `FeatureCollection` into zone features.
///
/// Features without a usable name are skipped. Features whose geometry is
/// missing or not a polygon are kept with `geometry: None` so the zone is
/// still reported (with zero counts).
///
/// # Errors
///
/// Returns [`ZoneError`] if the document is not `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_features(
    document: &str,
    dataset: &ZoneDataset,
) -> Result<Vec<ZoneFeature>, ZoneError> {
    let GeoJson::FeatureCollection(collection) = document.parse::<GeoJson>()? else {
        return Err(ZoneError::Conversion {
            message: "Boundary document is not a FeatureCollection".to_string(),
        });
    };

    let mut unnamed = 0_usize;
    let mut features = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let Some(name) = property_str(&feature, &dataset.name_property) else {
            unnamed += 1;
            continue;
        };
        let parent_region = property_str(&feature, &dataset.parent_property).unwrap_or_default();

        let geometry = feature
            .geometry
            .and_then(hazard_map_spatial::to_multipolygon)
            .map(Geometry::MultiPolygon);

        if geometry.is_none() {
            log::warn!("Zone '{name}' in dataset '{}' has no usable geometry", dataset.id);
        }

        features.push(ZoneFeature {
            name,
            parent_region,
            level: dataset.level,
            geometry,
        });
    }

    if unnamed > 0 {
        log::warn!(
            "Dropped {unnamed} unnamed feature(s) from dataset '{}'",
            dataset.id
        );
    }

    Ok(features)
}

fn property_str(feature: &geojson::Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

//! Overpass API query construction and response parsing.
//!
//! See <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

use std::collections::BTreeMap;

use hazard_map_road_models::{RoadGeometry, RoadQueryConfig};
use serde::Deserialize;

use crate::RoadError;

/// Name used when a way has neither a `name` nor a `highway` tag.
pub const UNNAMED_ROAD: &str = "Unnamed Road";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    #[serde(default)]
    geometry: Vec<OverpassPoint>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassPoint {
    lat: f64,
    lon: f64,
}

/// Builds the bounding-box scoped road query.
///
/// The query returns every way whose `highway` tag is one of the configured
/// classes, with inline geometry so no node lookups are needed.
#[must_use]
pub fn build_query(config: &RoadQueryConfig) -> String {
    let bbox = config.bbox;
    let classes = config.highway_classes.join("|");

    format!(
        "[out:json][timeout:{timeout}];\n\
         way[\"highway\"~\"^({classes})$\"]({south},{west},{north},{east});\n\
         out geom tags;",
        timeout = config.timeout_secs,
        south = bbox.south,
        west = bbox.west,
        north = bbox.north,
        east = bbox.east,
    )
}

/// Parses an Overpass JSON response into road geometries.
///
/// Ways with fewer than two geometry points are discarded, as are
/// non-way elements and repeated way ids.
///
/// # Errors
///
/// Returns [`RoadError::Json`] if the body has no `elements` array or the
/// elements are malformed.
pub fn parse_response(body: serde_json::Value) -> Result<Vec<RoadGeometry>, RoadError> {
    let response: OverpassResponse = serde_json::from_value(body)?;

    let mut seen = std::collections::BTreeSet::new();
    let mut discarded = 0_usize;
    let mut roads = Vec::with_capacity(response.elements.len());

    for element in response.elements {
        if element.kind != "way" || element.geometry.len() < 2 || !seen.insert(element.id) {
            discarded += 1;
            continue;
        }

        roads.push(RoadGeometry {
            id: element.id,
            name: road_name(&element.tags),
            coordinates: element.geometry.iter().map(|p| (p.lat, p.lon)).collect(),
        });
    }

    if discarded > 0 {
        log::debug!("Discarded {discarded} unusable Overpass element(s)");
    }

    Ok(roads)
}

/// Picks a display name: explicit name, then highway class, then a
/// placeholder.
fn road_name(tags: &BTreeMap<String, String>) -> String {
    ["name", "highway"]
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or(UNNAMED_ROAD)
        .to_string()
}

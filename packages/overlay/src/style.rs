//! Style descriptors handed to the map renderer.

use hazard_map_incident_models::{HeatSample, RiskTier};
use hazard_map_road_models::RoadSegment;
use hazard_map_zone_models::ZoneRiskRecord;
use serde::Serialize;

/// Fill and outline for a zone polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyle {
    /// CSS color of the polygon fill.
    pub fill_color: &'static str,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// CSS color of the outline.
    pub stroke_color: &'static str,
    /// Outline width in pixels.
    pub stroke_weight: f64,
}

/// Stroke for a road polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadStyle {
    /// CSS color of the line.
    pub stroke_color: &'static str,
    /// Line opacity in `[0, 1]`.
    pub opacity: f64,
    /// Line width in pixels.
    pub stroke_weight: f64,
}

/// CSS color for a tier.
#[must_use]
pub const fn tier_color(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "#22c55e",
        RiskTier::Minor => "#84cc16",
        RiskTier::Moderate => "#eab308",
        RiskTier::High => "#f97316",
        RiskTier::Critical => "#dc2626",
    }
}

/// Zone style for a tier.
#[must_use]
pub const fn zone_style(tier: RiskTier) -> ZoneStyle {
    let fill_opacity = match tier {
        RiskTier::Low => 0.1,
        RiskTier::Minor => 0.25,
        RiskTier::Moderate => 0.35,
        RiskTier::High => 0.45,
        RiskTier::Critical => 0.55,
    };
    ZoneStyle {
        fill_color: tier_color(tier),
        fill_opacity,
        stroke_color: tier_color(tier),
        stroke_weight: 1.0,
    }
}

/// Road style for a tier. Riskier roads are drawn thicker.
#[must_use]
pub const fn road_style(tier: RiskTier) -> RoadStyle {
    let (opacity, stroke_weight) = match tier {
        RiskTier::Low => (0.5, 2.0),
        RiskTier::Minor => (0.6, 3.0),
        RiskTier::Moderate => (0.7, 4.0),
        RiskTier::High => (0.8, 5.0),
        RiskTier::Critical => (0.9, 6.0),
    };
    RoadStyle {
        stroke_color: tier_color(tier),
        opacity,
        stroke_weight,
    }
}

/// A zone record paired with its style.
#[derive(Debug, Clone, Serialize)]
pub struct StyledZone<'a> {
    /// The aggregated record.
    #[serde(flatten)]
    pub record: &'a ZoneRiskRecord,
    /// Rendering style.
    pub style: ZoneStyle,
}

/// A road segment paired with its style.
#[derive(Debug, Clone, Serialize)]
pub struct StyledRoad<'a> {
    /// The scored segment.
    #[serde(flatten)]
    pub segment: &'a RoadSegment,
    /// Rendering style.
    pub style: RoadStyle,
}

/// Styles every zone record.
pub fn style_zones<'a>(
    records: impl IntoIterator<Item = &'a ZoneRiskRecord>,
) -> Vec<StyledZone<'a>> {
    records
        .into_iter()
        .map(|record| StyledZone {
            record,
            style: zone_style(record.risk_tier),
        })
        .collect()
}

/// Styles every road segment.
pub fn style_roads<'a>(segments: impl IntoIterator<Item = &'a RoadSegment>) -> Vec<StyledRoad<'a>> {
    segments
        .into_iter()
        .map(|segment| StyledRoad {
            segment,
            style: road_style(segment.risk_tier),
        })
        .collect()
}

/// Flattens heat samples into `[lat, lon, intensity]` triples.
#[must_use]
pub fn heat_triples(samples: &[HeatSample]) -> Vec<[f64; 3]> {
    samples
        .iter()
        .map(|s| [s.latitude, s.longitude, s.intensity])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_distinct_color() {
        let colors: std::collections::BTreeSet<&str> =
            RiskTier::all().iter().map(|t| tier_color(*t)).collect();
        assert_eq!(colors.len(), RiskTier::all().len());
    }

    #[test]
    fn riskier_roads_are_heavier() {
        for pair in RiskTier::all().windows(2) {
            assert!(road_style(pair[0]).stroke_weight < road_style(pair[1]).stroke_weight);
            assert!(zone_style(pair[0]).fill_opacity < zone_style(pair[1]).fill_opacity);
        }
    }

    #[test]
    fn styled_road_serializes_flat() {
        let segment = RoadSegment {
            id: 5,
            name: "Diversion Road".to_string(),
            coordinates: vec![(13.6, 123.2), (13.61, 123.21)],
            risk_tier: RiskTier::High,
            risk_score: 61.0,
            accident_count: 6,
        };
        let styled = style_roads([&segment]);
        let json = serde_json::to_value(&styled).unwrap();

        assert_eq!(json[0]["id"], 5);
        assert_eq!(json[0]["riskTier"], "high");
        assert_eq!(json[0]["style"]["strokeColor"], "#f97316");
    }

    #[test]
    fn heat_triples_keep_order() {
        let samples = [
            HeatSample {
                latitude: 1.0,
                longitude: 2.0,
                intensity: 0.3,
            },
            HeatSample {
                latitude: 3.0,
                longitude: 4.0,
                intensity: 1.0,
            },
        ];
        assert_eq!(heat_triples(&samples), vec![[1.0, 2.0, 0.3], [3.0, 4.0, 1.0]]);
    }
}

//! Per-zone report aggregation.

use std::collections::{BTreeMap, BTreeSet};

use hazard_map_incident_models::Report;
use hazard_map_spatial::ZoneIndex;
use hazard_map_zone_models::{SeverityCounts, ZoneLevel, ZoneRiskRecord};

use crate::ZoneFeature;
use crate::classify::{classify, describe};

/// Identifies a zone within one pass. Names are only unique per level: a
/// barangay and a municipality may share a name.
pub type ZoneKey = (ZoneLevel, String);

/// Zone risk records for one aggregation pass.
pub type ZoneRiskMap = BTreeMap<ZoneKey, ZoneRiskRecord>;

/// Attributes every report to the zones whose bounding box contains it and
/// classifies each zone.
///
/// Every named zone yields exactly one record, including zones with no
/// reports and zones with unusable geometry. When two features of the same
/// level share a name, the first one wins. A report may count towards
/// several zones if their bounding boxes overlap. Reports with an unknown
/// severity are not counted.
///
/// The result depends only on the inputs, so repeated calls with the same
/// reports and zones produce identical maps.
#[must_use]
pub fn aggregate(reports: &[Report], zones: &[ZoneFeature]) -> ZoneRiskMap {
    let mut seen = BTreeSet::new();
    let unique: Vec<&ZoneFeature> = zones
        .iter()
        .filter(|zone| {
            let fresh = seen.insert((zone.level, zone.name.as_str()));
            if !fresh {
                log::warn!("Duplicate {} zone name '{}' ignored", zone.level, zone.name);
            }
            fresh
        })
        .collect();

    let index = ZoneIndex::build(
        unique
            .iter()
            .enumerate()
            .filter_map(|(i, zone)| zone.geometry.as_ref().map(|geometry| (i, geometry))),
    );

    let mut tallies = vec![SeverityCounts::default(); unique.len()];
    let mut unknown = 0_usize;

    for report in reports {
        for &i in index.zones_at(report.longitude, report.latitude) {
            if !tallies[i].record(report.severity) {
                unknown += 1;
            }
        }
    }

    if unknown > 0 {
        log::debug!("Ignored {unknown} zone hit(s) from reports with unknown severity");
    }

    let records: ZoneRiskMap = unique
        .into_iter()
        .zip(tallies)
        .map(|(zone, counts)| {
            let tier = classify(zone.level, &counts);
            let record = ZoneRiskRecord {
                zone_name: zone.name.clone(),
                parent_region: zone.parent_region.clone(),
                level: zone.level,
                total_count: counts.total(),
                counts_by_severity: counts,
                risk_tier: tier,
                description: describe(tier, &counts),
            };
            ((zone.level, zone.name.clone()), record)
        })
        .collect();

    log::debug!(
        "Aggregated {} report(s) into {} zone(s)",
        reports.len(),
        records.len()
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use geo::{Geometry, polygon};
    use hazard_map_incident_models::{RiskTier, Severity};

    fn zone(name: &str, level: ZoneLevel, min: (f64, f64), max: (f64, f64)) -> ZoneFeature {
        ZoneFeature {
            name: name.to_string(),
            parent_region: "Camarines Sur".to_string(),
            level,
            geometry: Some(Geometry::Polygon(polygon![
                (x: min.0, y: min.1),
                (x: max.0, y: min.1),
                (x: max.0, y: max.1),
                (x: min.0, y: max.1),
                (x: min.0, y: min.1),
            ])),
        }
    }

    fn report(lng: f64, lat: f64, severity: Severity) -> Report {
        Report {
            latitude: lat,
            longitude: lng,
            severity,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn barangay<'a>(records: &'a ZoneRiskMap, name: &str) -> &'a ZoneRiskRecord {
        &records[&(ZoneLevel::Barangay, name.to_string())]
    }

    fn municipality<'a>(records: &'a ZoneRiskMap, name: &str) -> &'a ZoneRiskRecord {
        &records[&(ZoneLevel::Municipality, name.to_string())]
    }

    fn zones() -> Vec<ZoneFeature> {
        vec![
            zone("Sabang", ZoneLevel::Barangay, (0.0, 0.0), (1.0, 1.0)),
            zone("Tabuco", ZoneLevel::Barangay, (2.0, 0.0), (3.0, 1.0)),
            zone("Naga City", ZoneLevel::Municipality, (0.0, 0.0), (3.0, 1.0)),
        ]
    }

    #[test]
    fn one_record_per_zone_with_consistent_totals() {
        let reports = vec![
            report(0.5, 0.5, Severity::Critical),
            report(0.6, 0.5, Severity::Minor),
            report(2.5, 0.5, Severity::High),
            report(9.0, 9.0, Severity::Critical),
        ];
        let records = aggregate(&reports, &zones());

        assert_eq!(records.len(), 3);
        for record in records.values() {
            let c = record.counts_by_severity;
            assert_eq!(record.total_count, c.critical + c.high + c.moderate + c.minor);
        }
        assert_eq!(barangay(&records, "Sabang").total_count, 2);
        assert_eq!(barangay(&records, "Tabuco").total_count, 1);
        assert_eq!(municipality(&records, "Naga City").total_count, 3);
    }

    #[test]
    fn classifies_each_level_with_its_own_table() {
        let reports = vec![
            report(0.5, 0.5, Severity::Critical),
            report(0.6, 0.6, Severity::Critical),
        ];
        let records = aggregate(&reports, &zones());

        assert_eq!(barangay(&records, "Sabang").risk_tier, RiskTier::Critical);
        assert_eq!(municipality(&records, "Naga City").risk_tier, RiskTier::High);
        assert_eq!(barangay(&records, "Tabuco").risk_tier, RiskTier::Low);
        assert_eq!(barangay(&records, "Tabuco").description, "No reported accidents");
    }

    #[test]
    fn single_critical_report_is_high() {
        let records = aggregate(&[report(0.5, 0.5, Severity::Critical)], &zones());
        assert_eq!(barangay(&records, "Sabang").risk_tier, RiskTier::High);
    }

    #[test]
    fn is_idempotent() {
        let reports = vec![
            report(0.5, 0.5, Severity::Moderate),
            report(2.2, 0.1, Severity::High),
        ];
        let zones = zones();
        assert_eq!(aggregate(&reports, &zones), aggregate(&reports, &zones));
    }

    #[test]
    fn malformed_zone_still_reported_with_zero_counts() {
        let mut zones = zones();
        zones.push(ZoneFeature {
            name: "Broken".to_string(),
            parent_region: String::new(),
            level: ZoneLevel::Barangay,
            geometry: None,
        });
        let records = aggregate(&[report(0.5, 0.5, Severity::High)], &zones);

        assert_eq!(records.len(), 4);
        assert_eq!(barangay(&records, "Broken").total_count, 0);
        assert_eq!(barangay(&records, "Broken").risk_tier, RiskTier::Low);
    }

    #[test]
    fn duplicate_names_keep_first_zone() {
        let zones = vec![
            zone("Poblacion", ZoneLevel::Barangay, (0.0, 0.0), (1.0, 1.0)),
            zone("Poblacion", ZoneLevel::Barangay, (5.0, 5.0), (6.0, 6.0)),
        ];
        let records = aggregate(&[report(5.5, 5.5, Severity::Critical)], &zones);

        assert_eq!(records.len(), 1);
        assert_eq!(barangay(&records, "Poblacion").total_count, 0);
    }

    #[test]
    fn unknown_severity_is_not_counted() {
        let records = aggregate(&[report(0.5, 0.5, Severity::Unknown)], &zones());
        assert_eq!(barangay(&records, "Sabang").total_count, 0);
        assert_eq!(barangay(&records, "Sabang").risk_tier, RiskTier::Low);
    }

    #[test]
    fn no_zones_yields_empty_map() {
        assert!(aggregate(&[report(0.5, 0.5, Severity::High)], &[]).is_empty());
    }

    #[test]
    fn same_name_at_both_levels_yields_two_records() {
        let zones = vec![
            zone("San Jose", ZoneLevel::Barangay, (0.0, 0.0), (1.0, 1.0)),
            zone("San Jose", ZoneLevel::Municipality, (0.0, 0.0), (10.0, 10.0)),
        ];
        let records = aggregate(&[report(5.0, 5.0, Severity::Critical)], &zones);

        assert_eq!(records.len(), 2);
        assert_eq!(barangay(&records, "San Jose").total_count, 0);
        assert_eq!(barangay(&records, "San Jose").risk_tier, RiskTier::Low);
        assert_eq!(municipality(&records, "San Jose").total_count, 1);
        assert_eq!(municipality(&records, "San Jose").risk_tier, RiskTier::High);
    }
}

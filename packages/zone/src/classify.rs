//! Tier thresholds for zone risk.
//!
//! Rules are evaluated top-down and the first match wins. Municipalities
//! cover strictly more area than barangays, so their table needs larger
//! counts before it saturates.

use hazard_map_incident_models::RiskTier;
use hazard_map_zone_models::{SeverityCounts, ZoneLevel};

/// One row of a threshold table.
///
/// A row matches when any of its minimums is reached.
struct TierRule {
    tier: RiskTier,
    critical: Option<u32>,
    high: Option<u32>,
    moderate: Option<u32>,
    total: u32,
}

impl TierRule {
    const fn matches(&self, counts: &SeverityCounts) -> bool {
        let total = counts.total();
        reaches(counts.critical, self.critical)
            || reaches(counts.high, self.high)
            || reaches(counts.moderate, self.moderate)
            || total >= self.total
    }
}

const fn reaches(count: u32, min: Option<u32>) -> bool {
    match min {
        Some(min) => count >= min,
        None => false,
    }
}

const BARANGAY_RULES: &[TierRule] = &[
    TierRule {
        tier: RiskTier::Critical,
        critical: Some(2),
        high: None,
        moderate: None,
        total: 5,
    },
    TierRule {
        tier: RiskTier::High,
        critical: Some(1),
        high: Some(2),
        moderate: None,
        total: 3,
    },
    TierRule {
        tier: RiskTier::Moderate,
        critical: None,
        high: Some(1),
        moderate: Some(2),
        total: 2,
    },
    TierRule {
        tier: RiskTier::Minor,
        critical: None,
        high: None,
        moderate: None,
        total: 1,
    },
];

const MUNICIPALITY_RULES: &[TierRule] = &[
    TierRule {
        tier: RiskTier::Critical,
        critical: Some(3),
        high: None,
        moderate: None,
        total: 8,
    },
    TierRule {
        tier: RiskTier::High,
        critical: Some(1),
        high: Some(3),
        moderate: None,
        total: 5,
    },
    TierRule {
        tier: RiskTier::Moderate,
        critical: None,
        high: Some(1),
        moderate: Some(2),
        total: 3,
    },
    TierRule {
        tier: RiskTier::Minor,
        critical: None,
        high: None,
        moderate: None,
        total: 1,
    },
];

const fn rules_for(level: ZoneLevel) -> &'static [TierRule] {
    match level {
        ZoneLevel::Barangay => BARANGAY_RULES,
        ZoneLevel::Municipality => MUNICIPALITY_RULES,
    }
}

/// Classifies a zone's tallies into a tier.
///
/// Zones with no reports are always [`RiskTier::Low`].
#[must_use]
pub fn classify(level: ZoneLevel, counts: &SeverityCounts) -> RiskTier {
    rules_for(level)
        .iter()
        .find(|rule| rule.matches(counts))
        .map_or(RiskTier::Low, |rule| rule.tier)
}

/// Builds the human-readable zone summary.
#[must_use]
pub fn describe(tier: RiskTier, counts: &SeverityCounts) -> String {
    let total = counts.total();
    if total == 0 {
        return "No reported accidents".to_string();
    }

    format!(
        "{} risk: {total} accident{} ({} critical, {} high, {} moderate, {} minor)",
        tier.label(),
        if total == 1 { "" } else { "s" },
        counts.critical,
        counts.high,
        counts.moderate,
        counts.minor,
    )
}

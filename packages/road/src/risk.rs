//! Per-road risk assignment.
//!
//! A [`RiskScorer`] turns a road into a [`RoadRisk`]. Two implementations
//! exist: [`OverrideTable`], holding scores from an external classifier,
//! and [`HeuristicScorer`], a deterministic keyword stand-in until that
//! classifier covers every road. [`RoadRiskAssigner`] always asks the
//! override scorer first.

use std::collections::BTreeMap;

use hazard_map_incident_models::RiskTier;
use hazard_map_road_models::{RoadGeometry, RoadQueryConfig, RoadRisk, RoadSegment, ScoreOverride};

/// Maps a `[0, 100]` score onto a tier.
#[must_use]
pub fn score_tier(score: f64) -> RiskTier {
    if score >= 75.0 {
        RiskTier::Critical
    } else if score >= 50.0 {
        RiskTier::High
    } else if score >= 25.0 {
        RiskTier::Moderate
    } else if score >= 10.0 {
        RiskTier::Minor
    } else {
        RiskTier::Low
    }
}

/// Builds a risk from a score, deriving the accident count from the score
/// when none is given.
#[must_use]
pub fn risk_from_score(score: f64, accident_count: Option<u32>) -> RoadRisk {
    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let derived = (score / 10.0).floor() as u32;

    RoadRisk {
        risk_tier: score_tier(score),
        risk_score: score,
        accident_count: accident_count.unwrap_or(derived),
    }
}

/// Strategy for scoring a single road.
pub trait RiskScorer: Send + Sync {
    /// Returns the road's risk, or `None` if this scorer has no opinion.
    fn score(&self, road: &RoadGeometry) -> Option<RoadRisk>;
}

/// Scores supplied by an external classifier, keyed by way id.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    scores: BTreeMap<i64, ScoreOverride>,
}

impl OverrideTable {
    /// Builds a table from override entries. Later entries for the same
    /// segment replace earlier ones.
    #[must_use]
    pub fn new(overrides: impl IntoIterator<Item = ScoreOverride>) -> Self {
        Self {
            scores: overrides
                .into_iter()
                .map(|entry| (entry.segment_id, entry))
                .collect(),
        }
    }

    /// Number of segments with an override.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` if the table holds no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl RiskScorer for OverrideTable {
    fn score(&self, road: &RoadGeometry) -> Option<RoadRisk> {
        self.scores
            .get(&road.id)
            .map(|entry| risk_from_score(entry.risk_score, entry.accident_count))
    }
}

/// Keyword heuristic standing in for a real per-road model.
///
/// Deterministic: the same id and name always produce the same risk.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    high_risk_keywords: Vec<String>,
    moderate_risk_keywords: Vec<String>,
}

impl HeuristicScorer {
    /// Creates a scorer from two keyword lists. Matching is
    /// case-insensitive.
    #[must_use]
    pub fn new(high_risk_keywords: &[String], moderate_risk_keywords: &[String]) -> Self {
        let normalize = |keywords: &[String]| -> Vec<String> {
            keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };
        Self {
            high_risk_keywords: normalize(high_risk_keywords),
            moderate_risk_keywords: normalize(moderate_risk_keywords),
        }
    }

    /// Creates a scorer from the keyword lists in a road query config.
    #[must_use]
    pub fn from_config(config: &RoadQueryConfig) -> Self {
        Self::new(&config.high_risk_keywords, &config.moderate_risk_keywords)
    }

    fn matches(keywords: &[String], name: &str) -> bool {
        keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

/// `id mod k`, always non-negative.
fn id_mod(id: i64, k: i64) -> u32 {
    u32::try_from(id.rem_euclid(k)).unwrap_or(0)
}

const fn tier_rank(tier: RiskTier) -> u32 {
    match tier {
        RiskTier::Low => 0,
        RiskTier::Minor => 1,
        RiskTier::Moderate => 2,
        RiskTier::High => 3,
        RiskTier::Critical => 4,
    }
}

impl RiskScorer for HeuristicScorer {
    fn score(&self, road: &RoadGeometry) -> Option<RoadRisk> {
        let name = road.name.to_lowercase();
        let id = road.id;

        let (score, accidents) = if Self::matches(&self.high_risk_keywords, &name) {
            (60 + id_mod(id, 40), 5 + id_mod(id, 10))
        } else if Self::matches(&self.moderate_risk_keywords, &name) {
            (30 + id_mod(id, 30), 2 + id_mod(id, 5))
        } else {
            let score = match id_mod(id, 100) {
                0..2 => 80 + id_mod(id, 20),
                2..7 => 55 + id_mod(id, 20),
                7..17 => 30 + id_mod(id, 20),
                17..37 => 12 + id_mod(id, 13),
                _ => id_mod(id, 10),
            };
            let tier = score_tier(f64::from(score));
            (score, id_mod(id, 3) * tier_rank(tier))
        };

        Some(risk_from_score(f64::from(score), Some(accidents)))
    }
}

/// Attaches a risk to every road, preferring overrides over the fallback
/// scorer.
pub struct RoadRiskAssigner {
    overrides: Option<Box<dyn RiskScorer>>,
    fallback: Box<dyn RiskScorer>,
}

impl RoadRiskAssigner {
    /// Creates an assigner with only a fallback scorer.
    #[must_use]
    pub fn new(fallback: Box<dyn RiskScorer>) -> Self {
        Self {
            overrides: None,
            fallback,
        }
    }

    /// Creates an assigner using the keyword heuristic from `config`.
    #[must_use]
    pub fn heuristic(config: &RoadQueryConfig) -> Self {
        Self::new(Box::new(HeuristicScorer::from_config(config)))
    }

    /// Consults `overrides` before the fallback scorer.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Box<dyn RiskScorer>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Assigns a risk to one road.
    #[must_use]
    pub fn assign_risk(&self, road: &RoadGeometry) -> RoadRisk {
        self.overrides
            .as_ref()
            .and_then(|scorer| scorer.score(road))
            .or_else(|| self.fallback.score(road))
            .unwrap_or_else(|| risk_from_score(0.0, Some(0)))
    }

    /// Assigns a risk to every road, preserving order.
    #[must_use]
    pub fn assign_all(&self, roads: Vec<RoadGeometry>) -> Vec<RoadSegment> {
        let segments: Vec<RoadSegment> = roads
            .into_iter()
            .map(|road| {
                let risk = self.assign_risk(&road);
                RoadSegment::new(road, risk)
            })
            .collect();

        log::debug!("Assigned risk to {} road segment(s)", segments.len());
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road(id: i64, name: &str) -> RoadGeometry {
        RoadGeometry {
            id,
            name: name.to_string(),
            coordinates: vec![(13.6, 123.2), (13.61, 123.21)],
        }
    }

    fn heuristic() -> HeuristicScorer {
        HeuristicScorer::new(
            &["Highway".to_string(), "diversion".to_string()],
            &["avenue".to_string()],
        )
    }

    #[test]
    fn score_bands() {
        assert_eq!(score_tier(100.0), RiskTier::Critical);
        assert_eq!(score_tier(75.0), RiskTier::Critical);
        assert_eq!(score_tier(74.9), RiskTier::High);
        assert_eq!(score_tier(50.0), RiskTier::High);
        assert_eq!(score_tier(25.0), RiskTier::Moderate);
        assert_eq!(score_tier(10.0), RiskTier::Minor);
        assert_eq!(score_tier(9.99), RiskTier::Low);
        assert_eq!(score_tier(0.0), RiskTier::Low);
    }

    #[test]
    fn override_wins_over_heuristic_match() {
        let assigner = RoadRiskAssigner::new(Box::new(heuristic())).with_overrides(Box::new(
            OverrideTable::new([ScoreOverride {
                segment_id: 41,
                risk_score: 80.0,
                accident_count: None,
            }]),
        ));

        let risk = assigner.assign_risk(&road(41, "Maharlika Highway"));
        assert_eq!(risk.risk_tier, RiskTier::Critical);
        assert!((risk.risk_score - 80.0).abs() < f64::EPSILON);
        assert_eq!(risk.accident_count, 8);
    }

    #[test]
    fn low_override_still_wins() {
        let assigner = RoadRiskAssigner::new(Box::new(heuristic())).with_overrides(Box::new(
            OverrideTable::new([ScoreOverride {
                segment_id: 41,
                risk_score: 5.0,
                accident_count: Some(0),
            }]),
        ));

        let risk = assigner.assign_risk(&road(41, "Maharlika Highway"));
        assert_eq!(risk.risk_tier, RiskTier::Low);
        assert_eq!(risk.accident_count, 0);
    }

    #[test]
    fn missing_override_falls_back_to_heuristic() {
        let assigner = RoadRiskAssigner::new(Box::new(heuristic()))
            .with_overrides(Box::new(OverrideTable::default()));

        let risk = assigner.assign_risk(&road(41, "Maharlika Highway"));
        assert_eq!(risk, heuristic().score(&road(41, "Maharlika Highway")).unwrap());
    }

    #[test]
    fn override_scores_are_clamped() {
        let risk = risk_from_score(140.0, None);
        assert!((risk.risk_score - 100.0).abs() < f64::EPSILON);
        assert_eq!(risk.risk_tier, RiskTier::Critical);
        assert_eq!(risk_from_score(-3.0, None).risk_tier, RiskTier::Low);
        assert!(risk_from_score(f64::NAN, None).risk_score.abs() < f64::EPSILON);
    }

    #[test]
    fn heuristic_is_deterministic() {
        let scorer = heuristic();
        for id in [1, 17, 99, 12_345_678] {
            for name in ["Maharlika Highway", "Magsaysay Avenue", "Rizal Street"] {
                assert_eq!(scorer.score(&road(id, name)), scorer.score(&road(id, name)));
            }
        }
    }

    #[test]
    fn high_keyword_matches_case_insensitively() {
        // 60 + 41 mod 40 = 61
        let risk = heuristic().score(&road(41, "MAHARLIKA HIGHWAY")).unwrap();
        assert!((risk.risk_score - 61.0).abs() < f64::EPSILON);
        assert_eq!(risk.risk_tier, RiskTier::High);
        assert_eq!(risk.accident_count, 6);
    }

    #[test]
    fn moderate_keyword() {
        // 30 + 41 mod 30 = 41
        let risk = heuristic().score(&road(41, "Magsaysay Avenue")).unwrap();
        assert!((risk.risk_score - 41.0).abs() < f64::EPSILON);
        assert_eq!(risk.risk_tier, RiskTier::Moderate);
        assert_eq!(risk.accident_count, 3);
    }

    #[test]
    fn unmatched_roads_spread_over_all_tiers() {
        let scorer = heuristic();
        let tiers: std::collections::BTreeSet<RiskTier> = (0..100)
            .map(|id| scorer.score(&road(id, "Rizal Street")).unwrap().risk_tier)
            .collect();
        assert_eq!(tiers.len(), RiskTier::all().len());

        let low = (0..100)
            .filter(|id| scorer.score(&road(*id, "Rizal Street")).unwrap().risk_tier == RiskTier::Low)
            .count();
        assert_eq!(low, 63);
    }

    #[test]
    fn heuristic_tier_matches_its_score() {
        let scorer = heuristic();
        for id in 0..500 {
            for name in ["Diversion Road", "Panganiban Avenue", "Unnamed Road"] {
                let risk = scorer.score(&road(id, name)).unwrap();
                assert_eq!(risk.risk_tier, score_tier(risk.risk_score));
            }
        }
    }

    #[test]
    fn negative_ids_are_handled() {
        let risk = heuristic().score(&road(-7, "Rizal Street")).unwrap();
        assert!(risk.risk_score >= 0.0);
    }

    #[test]
    fn assign_all_preserves_order() {
        let assigner = RoadRiskAssigner::new(Box::new(heuristic()));
        let segments = assigner.assign_all(vec![road(3, "A"), road(1, "B"), road(2, "C")]);
        let ids: Vec<i64> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}

//! Zone and heat overlays derived from the report set.
//!
//! Both overlays are recomputed in full whenever the reports or the zone
//! boundaries change. There is no incremental update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hazard_map_incident_models::{HeatSample, Report};
use hazard_map_zone::{ZoneFeature, ZoneRiskMap};

use crate::store::{OverlayStore, RequestToken};

/// Output of one recompute pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSnapshot {
    /// One record per named zone, keyed by level and name.
    pub zones: ZoneRiskMap,
    /// One heat sample per report, in report order.
    pub heat: Vec<HeatSample>,
}

/// Computes both report-derived overlays.
#[must_use]
pub fn compute(reports: &[Report], zones: &[ZoneFeature], now: DateTime<Utc>) -> ReportSnapshot {
    ReportSnapshot {
        zones: hazard_map_zone::aggregate(reports, zones),
        heat: hazard_map_heat::compute_intensity(reports, now),
    }
}

/// Latest zone and heat overlays.
#[derive(Default)]
pub struct ReportOverlays {
    store: OverlayStore<ReportSnapshot>,
}

impl ReportOverlays {
    /// Creates an empty overlay set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a recompute, superseding any still in flight.
    pub fn begin(&self) -> RequestToken {
        self.store.begin()
    }

    /// Publishes the result of the recompute identified by `token`.
    ///
    /// Returns `false` if a newer recompute has started since.
    pub fn publish(&self, token: RequestToken, snapshot: ReportSnapshot) -> bool {
        self.store.publish(token, snapshot)
    }

    /// Recomputes and publishes in one step.
    pub fn recompute(&self, reports: &[Report], zones: &[ZoneFeature], now: DateTime<Utc>) -> bool {
        let token = self.begin();
        let snapshot = compute(reports, zones, now);
        log::info!(
            "Recomputed overlays: {} zone(s), {} heat sample(s)",
            snapshot.zones.len(),
            snapshot.heat.len()
        );
        self.publish(token, snapshot)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Option<Arc<ReportSnapshot>> {
        self.store.current()
    }
}

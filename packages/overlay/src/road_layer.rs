//! Road overlay state: fetch, score, and expose loading/error status.
//!
//! The renderer polls [`RoadLayer::status`] for the loading flag and any
//! error message, and holds a [`RetryHandle`] it can trigger from its UI.
//! A retry re-runs the full fetch from the first mirror.

use std::sync::{Arc, Mutex, PoisonError};

use hazard_map_road::{RoadFetcher, RoadRiskAssigner};
use hazard_map_road_models::RoadSegment;
use serde::Serialize;

use crate::store::OverlayStore;

/// Snapshot of the road layer for the renderer.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadLayerStatus {
    /// A fetch is in flight.
    pub loading: bool,
    /// User-facing message from the last failed fetch.
    pub error: Option<String>,
    /// Number of segments in the current snapshot.
    pub segment_count: usize,
}

struct Inner {
    fetcher: RoadFetcher,
    assigner: RoadRiskAssigner,
    segments: OverlayStore<Vec<RoadSegment>>,
    status: Mutex<RoadLayerStatus>,
}

impl Inner {
    fn update_status(&self, f: impl FnOnce(&mut RoadLayerStatus)) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *status);
    }

    async fn load(&self) -> bool {
        let token = self.segments.begin();
        self.update_status(|status| {
            status.loading = true;
            status.error = None;
        });

        let result = self.fetcher.fetch_road_geometries().await;

        if !self.segments.is_current(token) {
            log::debug!("Road fetch {} superseded; result dropped", token.value());
            return false;
        }

        match result {
            Ok(roads) => {
                let segments = self.assigner.assign_all(roads);
                let count = segments.len();
                let published = self.segments.publish(token, segments);
                if published {
                    self.update_status(|status| {
                        status.loading = false;
                        status.segment_count = count;
                    });
                }
                published
            }
            Err(e) => {
                log::error!("Road layer unavailable: {e}");
                self.update_status(|status| {
                    status.loading = false;
                    status.error = Some(format!("Unable to load road data: {e}"));
                });
                false
            }
        }
    }
}

/// Owns the road overlay and its fetch lifecycle.
pub struct RoadLayer {
    inner: Arc<Inner>,
}

impl RoadLayer {
    /// Creates a layer that fetches with `fetcher` and scores with
    /// `assigner`. Nothing is fetched until [`RoadLayer::load`].
    #[must_use]
    pub fn new(fetcher: RoadFetcher, assigner: RoadRiskAssigner) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                assigner,
                segments: OverlayStore::new(),
                status: Mutex::new(RoadLayerStatus::default()),
            }),
        }
    }

    /// Fetches and scores roads, replacing the current snapshot.
    ///
    /// Returns `true` if a new snapshot was published. On failure the
    /// previous snapshot stays in place and the error is exposed through
    /// [`RoadLayer::status`]; nothing is retried automatically.
    pub async fn load(&self) -> bool {
        self.inner.load().await
    }

    /// Current loading flag and error message.
    #[must_use]
    pub fn status(&self) -> RoadLayerStatus {
        self.inner
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Latest scored segments, if any fetch has succeeded.
    #[must_use]
    pub fn segments(&self) -> Option<Arc<Vec<RoadSegment>>> {
        self.inner.segments.current()
    }

    /// A handle the renderer can use to trigger a manual retry.
    #[must_use]
    pub fn retry_handle(&self) -> RetryHandle {
        RetryHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Manual retry trigger for the road layer.
///
/// Cheap to clone; every clone drives the same layer.
#[derive(Clone)]
pub struct RetryHandle {
    inner: Arc<Inner>,
}

impl RetryHandle {
    /// Re-runs the fetch from the first mirror.
    ///
    /// Returns `true` if a new snapshot was published.
    pub async fn retry(&self) -> bool {
        log::info!("Manual road layer retry requested");
        self.inner.load().await
    }
}

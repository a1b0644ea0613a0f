//! Sequential mirror failover for the road geometry query.
//!
//! Each mirror gets exactly one attempt with its own timeout. On any
//! failure the next mirror is tried; there is no backoff and no second
//! attempt against the same mirror. At most one request is in flight at a
//! time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hazard_map_road_models::{RoadGeometry, RoadQueryConfig};

use crate::{RoadError, overpass};

/// Extra time the client waits beyond the server-side `[timeout:N]`, so a
/// query that uses its full server budget can still deliver its body.
pub const CLIENT_TIMEOUT_MARGIN_SECS: u64 = 5;

/// Per-attempt client timeout for a server-side query timeout.
#[must_use]
pub const fn attempt_timeout(timeout_secs: u64) -> Duration {
    Duration::from_secs(timeout_secs.saturating_add(CLIENT_TIMEOUT_MARGIN_SECS))
}

/// Transport used to send a query to one mirror.
///
/// Implemented over HTTP by [`HttpMirrorClient`]; tests substitute a
/// scripted client.
#[async_trait]
pub trait MirrorClient: Send + Sync {
    /// Sends `query` to `endpoint` and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RoadError`] on transport failure, non-success status, or
    /// an undecodable body.
    async fn query(&self, endpoint: &str, query: &str) -> Result<serde_json::Value, RoadError>;
}

/// [`MirrorClient`] backed by `reqwest`.
pub struct HttpMirrorClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpMirrorClient {
    /// Creates a client whose every request is bounded by `timeout`.
    #[must_use]
    pub const fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl MirrorClient for HttpMirrorClient {
    async fn query(&self, endpoint: &str, query: &str) -> Result<serde_json::Value, RoadError> {
        let resp = self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .timeout(self.timeout)
            .body(query.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RoadError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Fetches road geometries for the configured region.
#[derive(Clone)]
pub struct RoadFetcher {
    config: Arc<RoadQueryConfig>,
    client: Arc<dyn MirrorClient>,
}

impl RoadFetcher {
    /// Creates a fetcher that sends queries through `client`.
    #[must_use]
    pub fn new(config: RoadQueryConfig, client: Arc<dyn MirrorClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Creates a fetcher using HTTP. Each attempt waits slightly longer
    /// than the server-side query timeout.
    #[must_use]
    pub fn over_http(config: RoadQueryConfig, client: reqwest::Client) -> Self {
        let timeout = attempt_timeout(config.timeout_secs);
        Self::new(config, Arc::new(HttpMirrorClient::new(client, timeout)))
    }

    /// The query configuration.
    #[must_use]
    pub fn config(&self) -> &RoadQueryConfig {
        &self.config
    }

    /// Tries each mirror in order until one returns a usable response.
    ///
    /// Every call starts again from the first mirror.
    ///
    /// # Errors
    ///
    /// Returns [`RoadError::NoMirrors`] if no mirror is configured, or
    /// [`RoadError::AllMirrorsFailed`] wrapping the last mirror's error
    /// when every mirror fails.
    pub async fn fetch_road_geometries(&self) -> Result<Vec<RoadGeometry>, RoadError> {
        let mirrors = &self.config.mirrors;
        let query = overpass::build_query(&self.config);
        let mut last_error = None;

        for (attempt, endpoint) in mirrors.iter().enumerate() {
            log::info!(
                "Querying road mirror {}/{}: {endpoint}",
                attempt + 1,
                mirrors.len()
            );

            let result = match self.client.query(endpoint, &query).await {
                Ok(body) => overpass::parse_response(body),
                Err(e) => Err(e),
            };

            match result {
                Ok(roads) => {
                    log::info!("Fetched {} road(s) from {endpoint}", roads.len());
                    return Ok(roads);
                }
                Err(e) => {
                    log::warn!("Road mirror {endpoint} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        let Some(last) = last_error else {
            return Err(RoadError::NoMirrors);
        };

        log::error!("All {} road mirror(s) failed", mirrors.len());
        Err(RoadError::AllMirrorsFailed {
            attempts: mirrors.len(),
            last: Box::new(last),
        })
    }
}

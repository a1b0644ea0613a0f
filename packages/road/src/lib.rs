#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Road geometry retrieval and per-road risk assignment.
//!
//! Road ways come from the public Overpass API, which has no uptime
//! guarantee. [`mirrors::RoadFetcher`] issues the same query against an
//! ordered list of mirrors, one at a time, and only fails when every
//! mirror has failed.
//!
//! Risk is then attached to every way by [`risk::RoadRiskAssigner`], which
//! prefers an externally supplied score and falls back to a deterministic
//! name heuristic.

pub mod mirrors;
pub mod overpass;
pub mod risk;

use thiserror::Error;

pub use mirrors::{HttpMirrorClient, MirrorClient, RoadFetcher};
pub use risk::{HeuristicScorer, OverrideTable, RiskScorer, RoadRiskAssigner};

/// Errors from road geometry retrieval.
#[derive(Debug, Error)]
pub enum RoadError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A mirror answered with a non-success status.
    #[error("{endpoint} responded with HTTP {status}")]
    Status {
        /// Mirror URL.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// No mirrors are configured.
    #[error("No road data mirrors configured")]
    NoMirrors,

    /// Every configured mirror failed.
    #[error("All {attempts} road data mirror(s) failed; last error: {last}")]
    AllMirrorsFailed {
        /// Number of mirrors tried.
        attempts: usize,
        /// The error from the last mirror tried.
        last: Box<Self>,
    },
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Overlay state for the hazard map.
//!
//! Ties the engine together for a renderer: loads the [`EngineConfig`],
//! keeps the latest zone/heat snapshot ([`ReportOverlays`]) and road
//! snapshot ([`RoadLayer`]), and turns them into styled output. Each
//! snapshot is replaced atomically; the renderer never sees a partial
//! recompute.

pub mod config;
pub mod guard;
pub mod reports;
pub mod road_layer;
pub mod store;
pub mod style;

use thiserror::Error;

pub use config::EngineConfig;
pub use reports::{ReportOverlays, ReportSnapshot};
pub use road_layer::{RetryHandle, RoadLayer, RoadLayerStatus};

/// Errors from loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

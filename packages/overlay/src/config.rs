//! Engine configuration.
//!
//! A default configuration is embedded at compile time; a TOML file with
//! the same schema replaces it entirely.

use std::path::Path;

use hazard_map_road_models::RoadQueryConfig;
use hazard_map_zone_models::ZoneDataset;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Road geometry query and heuristic keywords.
    pub road: RoadQueryConfig,
    /// Zone boundary datasets, loaded in order.
    #[serde(default)]
    pub zones: Vec<ZoneDataset>,
}

impl EngineConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. It is a compile-time
    /// constant, so this is caught by the tests below.
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded engine config: {e}"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text does not match the schema.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reads `path` if given, otherwise returns the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the given file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::embedded()), Self::from_file)
    }
}

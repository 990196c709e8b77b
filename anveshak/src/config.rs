//! File configuration.
//!
//! ```toml
//! [exploration]
//! sensor_range = 10
//! frontier_strategy = "median"
//!
//! [maze]
//! size = 64
//! seed = 7
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::exploration::ExplorationConfig;

mod defaults {
    pub fn size() -> usize {
        32
    }

    pub fn seed() -> u64 {
        42
    }

    pub fn wall_density() -> f32 {
        0.1
    }
}

/// Random maze generator settings (used by the demo CLI).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Grid edge length in cells
    #[serde(default = "defaults::size")]
    pub size: usize,

    /// RNG seed
    #[serde(default = "defaults::seed")]
    pub seed: u64,

    /// Fraction of interior walls knocked out after carving (0..1)
    #[serde(default = "defaults::wall_density")]
    pub wall_density: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            seed: defaults::seed(),
            wall_density: defaults::wall_density(),
        }
    }
}

/// Top-level configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnveshakConfig {
    /// Exploration loop options
    #[serde(default)]
    pub exploration: ExplorationConfig,

    /// Maze generator options
    #[serde(default)]
    pub maze: MazeConfig,
}

impl AnveshakConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnveshakConfig = toml::from_str(content)?;
        log::debug!("[Config] loaded: {:?}", config);
        Ok(config)
    }
}

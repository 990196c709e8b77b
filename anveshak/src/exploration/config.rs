//! Exploration loop configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::frontier::FrontierStrategy;
use crate::graph::RegionLayout;
use crate::pathfinding::Heuristic;

/// Smallest accepted capacity for the trail and target history rings.
pub const MIN_HISTORY_CAPACITY: usize = 20;

/// Default value functions for serde deserialization.
mod defaults {
    pub fn sensor_range() -> usize {
        8
    }

    pub fn step_size() -> usize {
        1
    }

    pub fn max_iterations() -> usize {
        5000
    }

    pub fn exploration_threshold() -> f32 {
        100.0
    }

    pub fn enabled() -> bool {
        true
    }

    pub fn target_switch_cooldown() -> usize {
        5
    }

    pub fn region_size() -> usize {
        8
    }

    pub fn capacity() -> usize {
        32
    }
}

/// Configuration for the exploration loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Forward visibility cap in cells
    #[serde(default = "defaults::sensor_range")]
    pub sensor_range: usize,

    /// Cells advanced per MOVE
    #[serde(default = "defaults::step_size")]
    pub step_size: usize,

    /// Safety cap on loop iterations
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,

    /// Coverage percent at which to stop (0..=100)
    #[serde(default = "defaults::exploration_threshold")]
    pub exploration_threshold: f32,

    /// Wavefront frontier detection instead of the full-grid scan
    #[serde(default = "defaults::enabled")]
    pub use_wfd: bool,

    /// Frontier group reducer
    #[serde(default)]
    pub frontier_strategy: FrontierStrategy,

    /// Minimum iterations between target switches
    #[serde(default = "defaults::target_switch_cooldown")]
    pub target_switch_cooldown: usize,

    /// Sweep all eight headings on arriving at a frontier
    #[serde(default = "defaults::enabled")]
    pub scan_360_on_frontier: bool,

    /// Region edge length; must divide the grid size
    #[serde(default = "defaults::region_size")]
    pub region_size: usize,

    /// Heuristic for both abstract and refinement A*
    #[serde(default)]
    pub heuristic: Heuristic,

    /// Recent-positions ring capacity
    #[serde(default = "defaults::capacity")]
    pub trail_capacity: usize,

    /// Target history capacity
    #[serde(default = "defaults::capacity")]
    pub history_capacity: usize,

    /// Delay requested between iterations (milliseconds)
    #[serde(default)]
    pub step_delay_ms: u64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            sensor_range: defaults::sensor_range(),
            step_size: defaults::step_size(),
            max_iterations: defaults::max_iterations(),
            exploration_threshold: defaults::exploration_threshold(),
            use_wfd: true,
            frontier_strategy: FrontierStrategy::default(),
            target_switch_cooldown: defaults::target_switch_cooldown(),
            scan_360_on_frontier: true,
            region_size: defaults::region_size(),
            heuristic: Heuristic::default(),
            trail_capacity: defaults::capacity(),
            history_capacity: defaults::capacity(),
            step_delay_ms: 0,
        }
    }
}

impl ExplorationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for sensor range.
    pub fn with_sensor_range(mut self, range: usize) -> Self {
        self.sensor_range = range;
        self
    }

    /// Builder-style setter for step size.
    pub fn with_step_size(mut self, step: usize) -> Self {
        self.step_size = step;
        self
    }

    /// Builder-style setter for max iterations.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Builder-style setter for exploration threshold (percent).
    pub fn with_exploration_threshold(mut self, threshold: f32) -> Self {
        self.exploration_threshold = threshold;
        self
    }

    /// Builder-style setter for WFD usage.
    pub fn with_wfd(mut self, enabled: bool) -> Self {
        self.use_wfd = enabled;
        self
    }

    /// Builder-style setter for frontier strategy.
    pub fn with_frontier_strategy(mut self, strategy: FrontierStrategy) -> Self {
        self.frontier_strategy = strategy;
        self
    }

    /// Builder-style setter for target switch cooldown.
    pub fn with_target_switch_cooldown(mut self, iterations: usize) -> Self {
        self.target_switch_cooldown = iterations;
        self
    }

    /// Builder-style setter for the 360° scan on arrival.
    pub fn with_scan_360_on_frontier(mut self, enabled: bool) -> Self {
        self.scan_360_on_frontier = enabled;
        self
    }

    /// Builder-style setter for region size.
    pub fn with_region_size(mut self, size: usize) -> Self {
        self.region_size = size;
        self
    }

    /// Builder-style setter for heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Builder-style setter for trail capacity.
    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail_capacity = capacity;
        self
    }

    /// Builder-style setter for target history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Builder-style setter for the per-iteration delay.
    pub fn with_step_delay_ms(mut self, delay_ms: u64) -> Self {
        self.step_delay_ms = delay_ms;
        self
    }

    /// Check the configuration against a grid of `grid_size` cells per side.
    ///
    /// Returns the region layout on success.
    pub fn validate(&self, grid_size: usize) -> Result<RegionLayout, ConfigError> {
        if self.sensor_range == 0 {
            return Err(ConfigError::ZeroSensorRange);
        }
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroMaxIterations);
        }
        if !(0.0..=100.0).contains(&self.exploration_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.exploration_threshold));
        }
        for (name, value) in [
            ("trail_capacity", self.trail_capacity),
            ("history_capacity", self.history_capacity),
        ] {
            if value < MIN_HISTORY_CAPACITY {
                return Err(ConfigError::CapacityTooSmall {
                    name,
                    value,
                    min: MIN_HISTORY_CAPACITY,
                });
            }
        }
        RegionLayout::new(grid_size, self.region_size)
    }
}

//! Error types for Anveshak
//!
//! Three families, one per stage where things can go wrong:
//!
//! - [`ConfigError`]: rejected at startup (bad sizes, unknown enum values, TOML)
//! - [`WorldError`]: malformed ground truth or start pose
//! - [`ExplorationError`]: fatal invariant violations inside the loop
//!
//! Normal termination (no frontiers, coverage reached, iteration cap) is not
//! an error; see [`crate::exploration::TerminationReason`].

use std::path::PathBuf;

use thiserror::Error;

use crate::core::Position;
use crate::diagnostics::DiagnosticReport;
use crate::pathfinding::PathFailure;

/// Invalid configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("region size must be positive")]
    ZeroRegionSize,

    #[error("grid size {grid} is not a positive multiple of region size {region}")]
    RegionMismatch { grid: usize, region: usize },

    #[error("sensor range must be positive")]
    ZeroSensorRange,

    #[error("step size must be at least 1")]
    ZeroStepSize,

    #[error("max iterations must be positive")]
    ZeroMaxIterations,

    #[error("exploration threshold {0} is outside 0..=100")]
    ThresholdOutOfRange(f32),

    #[error("{name} is {value}, must be at least {min}")]
    CapacityTooSmall {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Malformed maze or start pose.
#[derive(Error, Debug)]
pub enum WorldError {
    #[error("maze is empty")]
    Empty,

    #[error("maze row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown maze glyph '{glyph}' at ({row}, {col})")]
    UnknownGlyph { row: usize, col: usize, glyph: char },

    #[error("truth value {value} at index {index} is not 0 or 1")]
    InvalidTruthValue { index: usize, value: u8 },

    #[error("maze has no start cell")]
    MissingStart,

    #[error("maze has more than one start cell ({first} and {second})")]
    MultipleStarts { first: Position, second: Position },

    #[error("start {0} is outside the maze")]
    StartOutOfBounds(Position),

    #[error("start {0} is a wall")]
    StartOnWall(Position),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fatal failure inside the exploration loop.
///
/// Each variant signals a graph-maintenance bug, never a property of the
/// maze, so none of them is recovered locally.
#[derive(Error, Debug, Clone)]
pub enum ExplorationError {
    #[error("frontier is not component-reachable from pose {}", .0.pose)]
    UnreachableFrontier(Box<DiagnosticReport>),

    #[error("no path to reachable target: {failure}")]
    PlanningMiss {
        failure: PathFailure,
        report: Box<DiagnosticReport>,
    },

    #[error("pose {} is not in any component", .0.pose)]
    PoseOutsideGraph(Box<DiagnosticReport>),
}

impl ExplorationError {
    /// Get a short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnreachableFrontier(_) => "UNREACHABLE_FRONTIER",
            Self::PlanningMiss { .. } => "PLANNING_MISS",
            Self::PoseOutsideGraph(_) => "POSE_OUTSIDE_GRAPH",
        }
    }

    /// Diagnostic block captured at the failure.
    pub fn report(&self) -> &DiagnosticReport {
        match self {
            Self::UnreachableFrontier(report)
            | Self::PlanningMiss { report, .. }
            | Self::PoseOutsideGraph(report) => report,
        }
    }
}

/// Anveshak error type
#[derive(Error, Debug)]
pub enum AnveshakError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("world error: {0}")]
    World(#[from] WorldError),

    #[error("exploration failed: {0}")]
    Exploration(#[from] ExplorationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnveshakError {
    /// Get a short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::World(_) => "WORLD",
            Self::Exploration(e) => e.code(),
            Self::Io(_) => "IO",
        }
    }

    /// Process exit code: 2 for invariant violations, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exploration(_) => 2,
            _ => 1,
        }
    }

    /// Diagnostic block, for exploration failures.
    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            Self::Exploration(e) => Some(e.report()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnveshakError>;

//! Records produced by the exploration loop.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Direction, Position};
use crate::error::ExplorationError;
use crate::frontier::Frontier;
use crate::graph::{ColoredMap, ComponentGraph};
use crate::grid::Grid;

/// Snapshot emitted after each loop iteration.
///
/// The map and graph are shared snapshots; the explorer copies on its next
/// write, so holding an event never blocks or observes later iterations.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    /// Iteration index, starting at 0
    pub iteration: usize,
    /// Pose after MOVE
    pub pose: Position,
    /// Heading after MOVE
    pub heading: Direction,
    /// Known-walkable / truth-walkable, percent
    pub coverage: f32,
    /// Known map
    pub known: Arc<Grid>,
    /// Component graph (holds the colored map)
    pub graph: Arc<ComponentGraph>,
    /// Frontiers surfaced this iteration
    pub frontiers: Vec<Frontier>,
    /// Current target, `None` right after arriving
    pub target: Option<Position>,
    /// Cells sensed this iteration, first-seen order
    pub sensor_hits: Vec<Position>,
    /// Planned path, pose first
    pub path: Vec<Position>,
    /// Cell the planned path actually ends on
    pub actual_end: Option<Position>,
    /// The target was switched this iteration
    pub switched: bool,
    /// Loop detection fired this iteration
    pub stuck: bool,
    /// Configured pause between iterations. `Explorer::next` already sleeps
    /// it before running the next iteration; consumers must not wait again.
    pub delay: Duration,
}

impl ProgressEvent {
    /// Component labels of the known map
    pub fn colored(&self) -> &ColoredMap {
        self.graph.colored()
    }
}

/// Why exploration ended normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// (T1) no frontiers remain
    NoFrontiers,
    /// (T2) coverage reached the configured threshold
    CoverageReached,
    /// (T3) iteration cap hit
    MaxIterations,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFrontiers => write!(f, "no frontiers remain"),
            Self::CoverageReached => write!(f, "coverage threshold reached"),
            Self::MaxIterations => write!(f, "iteration limit reached"),
        }
    }
}

/// One step of the exploration iterator.
#[derive(Debug)]
pub enum ExploreStatus {
    /// An iteration completed
    InProgress(Box<ProgressEvent>),
    /// Exploration ended normally
    Complete(TerminationReason),
    /// Exploration hit a fatal invariant violation
    Failed(ExplorationError),
}

/// Outcome of [`crate::exploration::Explorer::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorationSummary {
    /// Why the loop stopped
    pub reason: TerminationReason,
    /// Completed iterations
    pub iterations: usize,
    /// Final coverage, percent
    pub coverage: f32,
    /// Final pose
    pub pose: Position,
    /// Last target reached or given up; a normal stop leaves the pose on it
    pub last_target: Option<Position>,
    /// Target switches performed
    pub switches: usize,
    /// Component nodes in the final graph
    pub nodes: usize,
}

impl fmt::Display for ExplorationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} iterations: coverage {:.1}%, pose {}, {} switches, {} nodes",
            self.reason, self.iterations, self.coverage, self.pose, self.switches, self.nodes
        )
    }
}

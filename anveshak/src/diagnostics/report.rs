//! Typed diagnostic record captured on fatal exploration failures.

use std::fmt;

use crate::core::{Direction, Position};
use crate::graph::{ComponentGraph, ComponentKey, Transition};
use crate::grid::Grid;
use crate::pathfinding::PathFailure;
use crate::sensor::{Sensor, SensorOverlay};

use super::window::MapWindow;

/// Half-width of each rendered map window.
pub const WINDOW_RADIUS: i32 = 6;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A surfaced frontier was not component-reachable from the pose
    UnreachableFrontier,
    /// The planner found no path to a reachable target
    PlanningMiss(PathFailure),
    /// The pose cell has no component
    PoseOutsideGraph,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreachableFrontier => write!(f, "frontier not reachable from pose"),
            Self::PlanningMiss(failure) => write!(f, "planning miss {}", failure),
            Self::PoseOutsideGraph => write!(f, "pose outside component graph"),
        }
    }
}

/// Connectivity listing of one component node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentDump {
    /// Node key
    pub key: ComponentKey,
    /// Number of cells in the node
    pub cell_count: usize,
    /// Neighbours in insertion order
    pub neighbors: Vec<ComponentKey>,
    /// Border transitions in insertion order
    pub transitions: Vec<Transition>,
}

impl ComponentDump {
    /// Snapshot `key` from `graph`, if the node exists.
    pub fn capture(graph: &ComponentGraph, key: ComponentKey) -> Option<Self> {
        let node = graph.node(key)?;
        Some(Self {
            key,
            cell_count: node.cells().len(),
            neighbors: node.neighbors().iter().copied().collect(),
            transitions: node.transitions().to_vec(),
        })
    }
}

impl fmt::Display for ComponentDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} cells)", self.key, self.cell_count)?;
        if self.neighbors.is_empty() {
            writeln!(f, "    neighbours: none")?;
        } else {
            let list: Vec<String> = self.neighbors.iter().map(|k| k.to_string()).collect();
            writeln!(f, "    neighbours: {}", list.join(", "))?;
        }
        for t in &self.transitions {
            writeln!(f, "    {} -> {} via {}", t.from_cell, t.to_cell, t.to)?;
        }
        Ok(())
    }
}

/// Read-only view of the engine state needed to build a report.
#[derive(Clone, Copy)]
pub struct DiagnosticContext<'a> {
    /// Robot's known map
    pub known: &'a Grid,
    /// Ground truth
    pub truth: &'a Grid,
    /// Component graph
    pub graph: &'a ComponentGraph,
    /// Sensor in use, for the coverage overlay
    pub sensor: &'a dyn Sensor,
    /// Robot pose
    pub pose: Position,
    /// Robot heading
    pub heading: Direction,
    /// Loop iteration index
    pub iteration: usize,
    /// Number of frontiers surfaced this iteration
    pub frontier_count: usize,
}

/// Everything needed to debug a fatal failure, printable as a text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Failure kind
    pub kind: DiagnosticKind,
    /// Loop iteration index
    pub iteration: usize,
    /// Robot pose
    pub pose: Position,
    /// Robot heading
    pub heading: Direction,
    /// Offending target, if any
    pub target: Option<Position>,
    /// Component of the pose
    pub robot_component: Option<ComponentKey>,
    /// Component of the target
    pub target_component: Option<ComponentKey>,
    /// Nodes visited by the reachability BFS from the robot component
    pub bfs_visited: usize,
    /// BFS path from robot to target component, if one exists
    pub bfs_path: Option<Vec<ComponentKey>>,
    /// Robot node listing
    pub robot_node: Option<ComponentDump>,
    /// Target node listing
    pub target_node: Option<ComponentDump>,
    /// Frontiers surfaced this iteration
    pub frontier_count: usize,
    /// Rendered map windows
    pub windows: Vec<MapWindow>,
}

impl DiagnosticReport {
    /// Capture a report from the engine state.
    pub fn capture(ctx: DiagnosticContext<'_>, kind: DiagnosticKind, target: Option<Position>) -> Self {
        let graph = ctx.graph;
        let robot_component = graph.component_at(ctx.pose);
        let target_component = target.and_then(|t| graph.component_at(t));

        let (bfs_visited, bfs_path) = match robot_component {
            Some(origin) => {
                let trace = graph.reachable_from(origin);
                let path = target_component.and_then(|t| trace.path_to(t));
                (trace.visited_count(), path)
            }
            None => (0, None),
        };

        let mut marks = vec![(ctx.pose, 'R')];
        if let Some(t) = target {
            marks.push((t, 'T'));
        }

        let size = ctx.known.size();
        let mut windows = vec![MapWindow::capture(
            "known map around pose",
            size,
            ctx.pose,
            WINDOW_RADIUS,
            &marks,
            |p| ctx.known.get(p).map_or(' ', |c| c.as_char()),
        )];
        if let Some(t) = target.filter(|t| t.chebyshev_distance(&ctx.pose) > WINDOW_RADIUS) {
            windows.push(MapWindow::capture(
                "known map around target",
                size,
                t,
                WINDOW_RADIUS,
                &marks,
                |p| ctx.known.get(p).map_or(' ', |c| c.as_char()),
            ));
        }
        windows.push(MapWindow::capture(
            "ground truth",
            size,
            ctx.pose,
            WINDOW_RADIUS,
            &marks,
            |p| ctx.truth.get(p).map_or(' ', |c| c.as_char()),
        ));
        windows.push(MapWindow::capture(
            "colored map",
            size,
            ctx.pose,
            WINDOW_RADIUS,
            &marks,
            |p| graph.colored().glyph(p),
        ));
        let overlay = SensorOverlay::capture(ctx.sensor, ctx.truth, ctx.pose, ctx.heading);
        windows.push(MapWindow::capture(
            format!("sensor overlay facing {}", ctx.heading),
            size,
            ctx.pose,
            WINDOW_RADIUS,
            &[(ctx.pose, 'R')],
            |p| overlay.get(p).as_char(),
        ));

        Self {
            kind,
            iteration: ctx.iteration,
            pose: ctx.pose,
            heading: ctx.heading,
            target,
            robot_component,
            target_component,
            bfs_visited,
            bfs_path,
            robot_node: robot_component.and_then(|k| ComponentDump::capture(graph, k)),
            target_node: target_component.and_then(|k| ComponentDump::capture(graph, k)),
            frontier_count: ctx.frontier_count,
            windows,
        }
    }
}

fn fmt_key(key: Option<ComponentKey>) -> String {
    key.map_or_else(|| "none".to_string(), |k| k.to_string())
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==== exploration failure: {} ====", self.kind)?;
        writeln!(
            f,
            "iteration {}  pose {}  heading {}  frontiers {}",
            self.iteration, self.pose, self.heading, self.frontier_count
        )?;
        match self.target {
            Some(t) => writeln!(f, "target {}", t)?,
            None => writeln!(f, "target none")?,
        }
        writeln!(f, "robot component:  {}", fmt_key(self.robot_component))?;
        writeln!(f, "target component: {}", fmt_key(self.target_component))?;
        writeln!(f, "BFS visited: {} nodes", self.bfs_visited)?;
        match &self.bfs_path {
            Some(path) => {
                let hops: Vec<String> = path.iter().map(|k| k.to_string()).collect();
                writeln!(f, "BFS path: {}", hops.join(" -> "))?;
            }
            None => writeln!(f, "BFS path: none")?,
        }
        if let Some(dump) = &self.robot_node {
            write!(f, "robot node {}", dump)?;
        }
        if let Some(dump) = &self.target_node {
            write!(f, "target node {}", dump)?;
        }
        writeln!(f, "legend: R robot, T target, ? unknown, # wall, . walkable")?;
        for window in &self.windows {
            write!(f, "{}", window)?;
        }
        Ok(())
    }
}

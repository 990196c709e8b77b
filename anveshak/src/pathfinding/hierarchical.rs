//! Hierarchical A* (HAA*) over the component graph.
//!
//! ```text
//!  abstract:  C0 ──► C1 ──► C2            unit cost per transition
//!
//!  refined:   start ~~► t0.from │ t0.to ~~► t1.from │ t1.to ~~► goal
//!             └── A* in C0 ──┘    └── A* in C1 ──┘    └ A* in C2 ┘
//! ```
//!
//! The abstract search runs on component keys with the region-distance
//! heuristic. Each abstract hop is refined by an in-component A* to the
//! chosen transition's `from_cell`, then a single step across the border.

use std::collections::{BinaryHeap, HashMap};

use super::astar::component_astar;
use super::types::{HierarchicalPath, Heuristic, OpenNode, PathFailure};
use crate::core::Position;
use crate::graph::{ComponentGraph, ComponentKey};
use crate::grid::Grid;

/// HAA* planner over a known map and its component graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct HierarchicalPlanner {
    heuristic: Heuristic,
}

impl HierarchicalPlanner {
    /// Create a planner using `heuristic` at both levels
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic }
    }

    /// Configured heuristic
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Plan from `start` to `goal`; both cells must belong to components.
    pub fn plan(
        &self,
        known: &Grid,
        graph: &ComponentGraph,
        start: Position,
        goal: Position,
    ) -> Result<HierarchicalPath, PathFailure> {
        let goal_component = graph
            .component_at(goal)
            .ok_or(PathFailure::GoalOutsideGraph(goal))?;
        self.plan_into(known, graph, start, goal, goal_component)
    }

    /// Plan from `start` into `goal_component`, ending at `goal` if the
    /// component contains it, otherwise at the component cell nearest to
    /// `goal` by Manhattan distance.
    pub fn plan_into(
        &self,
        known: &Grid,
        graph: &ComponentGraph,
        start: Position,
        goal: Position,
        goal_component: ComponentKey,
    ) -> Result<HierarchicalPath, PathFailure> {
        let start_component = graph
            .component_at(start)
            .ok_or(PathFailure::StartOutsideGraph(start))?;
        let terminal = graph
            .node(goal_component)
            .ok_or(PathFailure::GoalOutsideGraph(goal))?;

        let abstract_path = self
            .abstract_search(graph, start_component, goal_component)
            .ok_or(PathFailure::NoAbstractPath {
                from: start_component,
                to: goal_component,
            })?;

        let mut detailed = vec![start];
        let mut current = start;

        for hop in abstract_path.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            let transition = graph
                .node(from)
                .and_then(|node| {
                    node.transitions_to(to).min_by(|a, b| {
                        self.heuristic
                            .cells(current, a.from_cell)
                            .total_cmp(&self.heuristic.cells(current, b.from_cell))
                    })
                })
                .copied()
                .ok_or(PathFailure::MissingTransition { from, to })?;

            let segment = self.segment(known, graph, from, current, transition.from_cell)?;
            append_segment(&mut detailed, &segment);
            append_segment(&mut detailed, &[transition.to_cell]);
            current = transition.to_cell;
        }

        let end = if terminal.contains(goal) {
            goal
        } else {
            terminal
                .cells()
                .iter()
                .copied()
                .min_by_key(|c| c.manhattan_distance(&goal))
                .ok_or(PathFailure::GoalOutsideGraph(goal))?
        };
        let segment = self.segment(known, graph, goal_component, current, end)?;
        append_segment(&mut detailed, &segment);

        log::trace!(
            "[HAA*] {} -> {}: {} components, {} cells",
            start,
            end,
            abstract_path.len(),
            detailed.len()
        );

        Ok(HierarchicalPath {
            abstract_path,
            actual_end: *detailed.last().unwrap_or(&start),
            detailed_path: detailed,
        })
    }

    fn segment(
        &self,
        known: &Grid,
        graph: &ComponentGraph,
        component: ComponentKey,
        from: Position,
        to: Position,
    ) -> Result<Vec<Position>, PathFailure> {
        component_astar(known, graph, component, from, to, self.heuristic).ok_or(
            PathFailure::NoSegmentPath {
                component,
                from,
                to,
            },
        )
    }

    /// A* on component keys with unit edge cost.
    pub fn abstract_search(
        &self,
        graph: &ComponentGraph,
        start: ComponentKey,
        goal: ComponentKey,
    ) -> Option<Vec<ComponentKey>> {
        graph.node(start)?;
        graph.node(goal)?;
        if start == goal {
            return Some(vec![start]);
        }

        let h = |k: ComponentKey| self.heuristic.regions(k.region, goal.region);
        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<ComponentKey, ComponentKey> = HashMap::new();
        let mut g_scores: HashMap<ComponentKey, u32> = HashMap::new();
        let mut seq = 0u64;

        g_scores.insert(start, 0);
        open.push(OpenNode {
            item: start,
            f_cost: h(start),
            seq,
        });

        while let Some(OpenNode { item: current, f_cost, .. }) = open.pop() {
            if current == goal {
                let mut path = vec![goal];
                let mut key = goal;
                while let Some(&prev) = came_from.get(&key) {
                    path.push(prev);
                    key = prev;
                }
                path.reverse();
                return Some(path);
            }

            let Some(&current_g) = g_scores.get(&current) else {
                continue;
            };
            if f_cost > current_g as f32 + h(current) {
                continue;
            }
            let Some(node) = graph.node(current) else {
                continue;
            };

            for &next in node.neighbors() {
                let tentative = current_g + 1;
                if g_scores.get(&next).is_none_or(|&g| tentative < g) {
                    came_from.insert(next, current);
                    g_scores.insert(next, tentative);
                    seq += 1;
                    open.push(OpenNode {
                        item: next,
                        f_cost: tentative as f32 + h(next),
                        seq,
                    });
                }
            }
        }

        None
    }
}

/// Append `segment`, skipping its first cell if it repeats the path's last cell.
fn append_segment(path: &mut Vec<Position>, segment: &[Position]) {
    let skip = match (path.last(), segment.first()) {
        (Some(last), Some(first)) if last == first => 1,
        _ => 0,
    };
    path.extend_from_slice(&segment[skip..]);
}

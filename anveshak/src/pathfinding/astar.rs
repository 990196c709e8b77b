//! In-component A* with 8-neighbour movement.
//!
//! Expansion never leaves the component: a neighbour is open only if it is
//! known-walkable and the colored map assigns it to the same component.
//! Diagonal steps are allowed whenever both end cells are in the component,
//! including between two blocked orthogonal cells.

use std::collections::{BinaryHeap, HashMap};

use super::types::{Heuristic, OpenNode, step_cost};
use crate::core::Position;
use crate::graph::{ComponentGraph, ComponentKey};
use crate::grid::Grid;

/// Shortest path from `start` to `goal` inside `component`, both inclusive.
///
/// Returns `None` if either end lies outside the component or no path exists.
pub fn component_astar(
    known: &Grid,
    graph: &ComponentGraph,
    component: ComponentKey,
    start: Position,
    goal: Position,
    heuristic: Heuristic,
) -> Option<Vec<Position>> {
    let inside = |p: Position| known.is_walkable(p) && graph.contains_cell(component, p);
    if !inside(start) || !inside(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_scores: HashMap<Position, f32> = HashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0.0);
    open.push(OpenNode {
        item: start,
        f_cost: heuristic.cells(start, goal),
        seq,
    });

    let mut nodes_expanded = 0usize;
    while let Some(OpenNode { item: current, f_cost, .. }) = open.pop() {
        if current == goal {
            let path = reconstruct(&came_from, goal);
            log::trace!(
                "[AStar] {} -> {} in {}: {} cells, {} expanded",
                start,
                goal,
                component,
                path.len(),
                nodes_expanded
            );
            return Some(path);
        }

        let current_g = g_scores.get(&current).copied().unwrap_or(f32::INFINITY);
        // Stale heap entry
        if f_cost > current_g + heuristic.cells(current, goal) + 1e-4 {
            continue;
        }
        nodes_expanded += 1;

        for next in current.neighbors_8() {
            if !inside(next) {
                continue;
            }
            let tentative = current_g + step_cost(current, next);
            if tentative + 1e-6 < g_scores.get(&next).copied().unwrap_or(f32::INFINITY) {
                came_from.insert(next, current);
                g_scores.insert(next, tentative);
                seq += 1;
                open.push(OpenNode {
                    item: next,
                    f_cost: tentative + heuristic.cells(next, goal),
                    seq,
                });
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

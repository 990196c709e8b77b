//! Pathfinding types shared by the abstract and in-component searches.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::Position;
use crate::error::ConfigError;
use crate::graph::{ComponentKey, RegionCoord};

/// Cost of a diagonal step
pub const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// Distance estimate used by both A* levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// |dr| + |dc|. Overestimates diagonal moves, so paths may come out
    /// slightly longer than optimal.
    Manhattan,
    /// max(|dr|, |dc|)
    #[default]
    Chebyshev,
}

impl Heuristic {
    /// Recognised names
    pub const NAMES: &'static str = "manhattan, chebyshev";

    #[inline]
    fn combine(self, d_row: i32, d_col: i32) -> f32 {
        let (dr, dc) = (d_row.abs(), d_col.abs());
        match self {
            Heuristic::Manhattan => (dr + dc) as f32,
            Heuristic::Chebyshev => dr.max(dc) as f32,
        }
    }

    /// Estimate between two cells
    #[inline]
    pub fn cells(self, a: Position, b: Position) -> f32 {
        self.combine(a.row - b.row, a.col - b.col)
    }

    /// Estimate between two regions (in region crossings)
    #[inline]
    pub fn regions(self, a: RegionCoord, b: RegionCoord) -> f32 {
        self.combine(a.row - b.row, a.col - b.col)
    }

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Chebyshev => "chebyshev",
        }
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "chebyshev" => Ok(Heuristic::Chebyshev),
            _ => Err(ConfigError::UnknownVariant {
                kind: "heuristic",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-list entry. Ordered for a min-heap on `f_cost`, then on insertion
/// sequence so equal-cost ties resolve first-in-first-out.
#[derive(Clone, Debug)]
pub(super) struct OpenNode<T> {
    pub item: T,
    pub f_cost: f32,
    pub seq: u64,
}

impl<T> PartialEq for OpenNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for OpenNode<T> {}

impl<T> Ord for OpenNode<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for OpenNode<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Why a hierarchical plan failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathFailure {
    /// (F1) start cell is not in any component
    StartOutsideGraph(Position),
    /// (F1) goal cell is not in any component
    GoalOutsideGraph(Position),
    /// (F2) no abstract path between the two components
    NoAbstractPath {
        /// Start component
        from: ComponentKey,
        /// Goal component
        to: ComponentKey,
    },
    /// (F3) in-component search failed for a segment
    NoSegmentPath {
        /// Component searched
        component: ComponentKey,
        /// Segment start
        from: Position,
        /// Segment goal
        to: Position,
    },
    /// (F4) consecutive abstract nodes without a transition
    MissingTransition {
        /// Component being left
        from: ComponentKey,
        /// Component being entered
        to: ComponentKey,
    },
}

impl PathFailure {
    /// Short failure code (F1..F4)
    pub fn code(&self) -> &'static str {
        match self {
            Self::StartOutsideGraph(_) | Self::GoalOutsideGraph(_) => "F1",
            Self::NoAbstractPath { .. } => "F2",
            Self::NoSegmentPath { .. } => "F3",
            Self::MissingTransition { .. } => "F4",
        }
    }
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            Self::StartOutsideGraph(p) => write!(f, "start {} is not in any component", p),
            Self::GoalOutsideGraph(p) => write!(f, "goal {} is not in any component", p),
            Self::NoAbstractPath { from, to } => {
                write!(f, "no abstract path from {} to {}", from, to)
            }
            Self::NoSegmentPath {
                component,
                from,
                to,
            } => write!(f, "no path inside {} from {} to {}", component, from, to),
            Self::MissingTransition { from, to } => {
                write!(f, "no transition from {} to {}", from, to)
            }
        }
    }
}

/// A refined hierarchical plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalPath {
    /// Components visited, start component first
    pub abstract_path: Vec<ComponentKey>,
    /// 8-connected cell path, pose first
    pub detailed_path: Vec<Position>,
    /// Last cell of the detailed path; differs from the requested goal when
    /// the goal was outside the terminal component
    pub actual_end: Position,
}

impl HierarchicalPath {
    /// Number of cells in the detailed path
    #[inline]
    pub fn len(&self) -> usize {
        self.detailed_path.len()
    }

    /// True for an empty detailed path
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detailed_path.is_empty()
    }

    /// Movement cost: 1 per cardinal step, √2 per diagonal step
    pub fn cost(&self) -> f32 {
        path_cost(&self.detailed_path)
    }
}

/// Movement cost of a cell path
pub fn path_cost(path: &[Position]) -> f32 {
    path.windows(2)
        .map(|w| step_cost(w[0], w[1]))
        .sum()
}

/// Cost of a single 8-neighbour step
#[inline]
pub fn step_cost(from: Position, to: Position) -> f32 {
    if from.is_diagonal_step(&to) {
        DIAGONAL_COST
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_heuristics() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -4);
        assert_eq!(Heuristic::Manhattan.cells(a, b), 7.0);
        assert_eq!(Heuristic::Chebyshev.cells(a, b), 4.0);
    }

    #[test]
    fn test_parse_heuristic() {
        assert_eq!("Manhattan".parse::<Heuristic>().unwrap(), Heuristic::Manhattan);
        assert!(matches!(
            "euclid".parse::<Heuristic>(),
            Err(ConfigError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_open_list_is_min_heap_with_fifo_ties() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenNode { item: 'a', f_cost: 2.0, seq: 0 });
        heap.push(OpenNode { item: 'b', f_cost: 1.0, seq: 1 });
        heap.push(OpenNode { item: 'c', f_cost: 1.0, seq: 2 });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|n| n.item)).collect();
        assert_eq!(order, vec!['b', 'c', 'a']);
    }

    #[test]
    fn test_path_cost() {
        let path = [Position::new(0, 0), Position::new(0, 1), Position::new(1, 2)];
        assert!((path_cost(&path) - (1.0 + DIAGONAL_COST)).abs() < 1e-6);
        assert_eq!(path_cost(&path[..1]), 0.0);
    }

    #[test]
    fn test_failure_codes() {
        let p = Position::new(1, 1);
        assert_eq!(PathFailure::StartOutsideGraph(p).code(), "F1");
        assert!(PathFailure::GoalOutsideGraph(p).to_string().starts_with("[F1]"));
    }
}

//! Frontier types and group reduction strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::Position;
use crate::error::ConfigError;
use crate::graph::ComponentKey;

/// How a frontier group is reduced to one target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierStrategy {
    /// First cell reached by the wavefront
    First,
    /// Mean row/col, rounded to the nearest cell
    #[default]
    Centroid,
    /// Middle cell of the wavefront order
    Median,
}

impl FrontierStrategy {
    /// Recognised names
    pub const NAMES: &'static str = "first, centroid, median";

    /// Reduce a group to its representative cell (before snapping).
    pub fn reduce(self, group: &FrontierGroup) -> Option<Position> {
        match self {
            FrontierStrategy::First => group.first(),
            FrontierStrategy::Centroid => group.centroid_cell(),
            FrontierStrategy::Median => group.median(),
        }
    }

    /// Lowercase name
    pub fn name(self) -> &'static str {
        match self {
            FrontierStrategy::First => "first",
            FrontierStrategy::Centroid => "centroid",
            FrontierStrategy::Median => "median",
        }
    }
}

impl FromStr for FrontierStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(FrontierStrategy::First),
            "centroid" => Ok(FrontierStrategy::Centroid),
            "median" => Ok(FrontierStrategy::Median),
            _ => Err(ConfigError::UnknownVariant {
                kind: "frontier strategy",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for FrontierStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A connected set of frontier cells, in wavefront discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontierGroup {
    points: Vec<Position>,
}

impl FrontierGroup {
    /// Create a group from ordered points
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    /// Points in discovery order
    #[inline]
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for an empty group
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First discovered cell
    pub fn first(&self) -> Option<Position> {
        self.points.first().copied()
    }

    /// Middle cell of the discovery order
    pub fn median(&self) -> Option<Position> {
        self.points.get(self.points.len() / 2).copied()
    }

    /// Mean (row, col)
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f32;
        let (rows, cols) = self
            .points
            .iter()
            .fold((0.0f32, 0.0f32), |(r, c), p| (r + p.row as f32, c + p.col as f32));
        Some((rows / n, cols / n))
    }

    /// Centroid rounded to a cell
    pub fn centroid_cell(&self) -> Option<Position> {
        self.centroid()
            .map(|(r, c)| Position::new(r.round() as i32, c.round() as i32))
    }

    /// Nearest group cell to `pos` by Chebyshev distance (first on ties)
    pub fn nearest_to(&self, pos: Position) -> Option<Position> {
        self.points
            .iter()
            .copied()
            .min_by_key(|p| p.chebyshev_distance(&pos))
    }
}

/// A surfaced exploration target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontier {
    /// Target cell (known-walkable, inside `component`)
    pub target: Position,
    /// Component holding the target
    pub component: ComponentKey,
    /// Cells of the originating group, discovery order
    pub cells: Vec<Position>,
}

impl Frontier {
    /// Number of frontier cells in the originating group
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> FrontierGroup {
        FrontierGroup::new(vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(0, 2),
            Position::new(1, 3),
        ])
    }

    #[test]
    fn test_strategies() {
        let g = group();
        assert_eq!(FrontierStrategy::First.reduce(&g), Some(Position::new(0, 0)));
        assert_eq!(FrontierStrategy::Median.reduce(&g), Some(Position::new(0, 2)));
        // mean = (0.25, 1.5) -> (0, 2)
        assert_eq!(
            FrontierStrategy::Centroid.reduce(&g),
            Some(Position::new(0, 2))
        );
    }

    #[test]
    fn test_empty_group() {
        let g = FrontierGroup::default();
        assert_eq!(FrontierStrategy::Centroid.reduce(&g), None);
        assert_eq!(g.nearest_to(Position::new(0, 0)), None);
    }

    #[test]
    fn test_nearest_prefers_first_on_ties() {
        let g = group();
        assert_eq!(g.nearest_to(Position::new(5, 1)), Some(Position::new(1, 3)));
        assert_eq!(g.nearest_to(Position::new(-1, 0)), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!(
            " Median ".parse::<FrontierStrategy>().unwrap(),
            FrontierStrategy::Median
        );
        assert!("closest".parse::<FrontierStrategy>().is_err());
    }
}

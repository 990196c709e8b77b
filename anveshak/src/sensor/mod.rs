//! Directional line-of-sight sensor.
//!
//! The sensor reads the ground truth, never the known map. For a pose and
//! heading it returns every cell of the heading's cone that has no wall
//! strictly between it and the pose on the Bresenham line.
//!
//! Cone shapes for range R (R = robot):
//!
//! ```text
//!   N, R = 3            NE, R = 3
//!
//!   # # # # # # #       # # # #
//!     # # # # #         R # # #
//!       # # #           . R # #       (quadrant triangle:
//!         R               . R #        depth + lateral <= R)
//! ```
//!
//! Cardinal cones spread one cell sideways per cell of depth. Diagonal cones
//! fill the quadrant triangle between the two adjacent cardinal axes. The
//! union over all eight headings is the Chebyshev square of radius R.

mod overlay;

pub use overlay::{Coverage, SensorOverlay};

use indexmap::IndexSet;

use crate::core::{Direction, Position};
use crate::grid::Grid;
use crate::grid::raycaster::cells_between;

/// Visibility model consumed by the exploration loop.
pub trait Sensor {
    /// Cells visible from `pose` facing `heading`, read against `truth`.
    fn visible(&self, truth: &Grid, pose: Position, heading: Direction) -> Vec<Position>;

    /// In-bounds cells within range for `heading`, ignoring occlusion.
    fn footprint(&self, size: usize, pose: Position, heading: Direction) -> Vec<Position>;

    /// Union of [`Sensor::visible`] over all eight headings, first-seen order.
    fn visible_360(&self, truth: &Grid, pose: Position) -> Vec<Position> {
        let mut cells = IndexSet::new();
        for heading in Direction::ALL {
            cells.extend(self.visible(truth, pose, heading));
        }
        cells.into_iter().collect()
    }
}

/// Forward cone sensor with a fixed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConeSensor {
    range: usize,
}

impl ConeSensor {
    /// Create a sensor with the given range in cells
    pub fn new(range: usize) -> Self {
        Self { range }
    }

    /// Sensor range in cells
    #[inline]
    pub fn range(&self) -> usize {
        self.range
    }

    /// In-bounds cells covered by the cone, ignoring occlusion.
    ///
    /// The pose cell itself is not part of the cone.
    pub fn cone_cells(&self, size: usize, pose: Position, heading: Direction) -> Vec<Position> {
        let range = self.range as i32;
        let (dr, dc) = heading.delta();
        let mut cells = Vec::new();

        if heading.is_diagonal() {
            // Quadrant triangle: `along_row` steps in dr, `along_col` in dc
            for depth in 1..=range {
                for along_row in 0..=depth {
                    let along_col = depth - along_row;
                    cells.push(pose.offset(dr * along_row, dc * along_col));
                }
            }
        } else {
            // Perpendicular of (dr, dc) is (-dc, dr)
            for depth in 1..=range {
                for side in -depth..=depth {
                    cells.push(pose.offset(dr * depth - dc * side, dc * depth + dr * side));
                }
            }
        }

        let n = size as i32;
        cells.retain(|p| (0..n).contains(&p.row) && (0..n).contains(&p.col));
        cells
    }
}

impl Sensor for ConeSensor {
    fn footprint(&self, size: usize, pose: Position, heading: Direction) -> Vec<Position> {
        self.cone_cells(size, pose, heading)
    }

    fn visible(&self, truth: &Grid, pose: Position, heading: Direction) -> Vec<Position> {
        let mut visible = Vec::new();
        if truth.is_walkable(pose) {
            visible.push(pose);
        }
        visible.extend(
            self.cone_cells(truth.size(), pose, heading)
                .into_iter()
                .filter(|&cell| line_of_sight(truth, pose, cell)),
        );
        log::trace!(
            "[Sensor] {} facing {}: {} visible cells",
            pose,
            heading,
            visible.len()
        );
        visible
    }
}

/// True if no wall lies strictly between `from` and `to`.
pub fn line_of_sight(truth: &Grid, from: Position, to: Position) -> bool {
    cells_between(from, to).all(|cell| !truth.get(cell).is_some_and(|c| c.is_wall()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellState;
    use std::collections::HashSet;

    #[test]
    fn test_north_cone_shape() {
        let sensor = ConeSensor::new(2);
        let cells: HashSet<_> = sensor
            .cone_cells(9, Position::new(4, 4), Direction::N)
            .into_iter()
            .collect();
        let expected: HashSet<_> = [
            Position::new(3, 3),
            Position::new(3, 4),
            Position::new(3, 5),
            Position::new(2, 2),
            Position::new(2, 3),
            Position::new(2, 4),
            Position::new(2, 5),
            Position::new(2, 6),
        ]
        .into_iter()
        .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_east_cone_spreads_vertically() {
        let sensor = ConeSensor::new(1);
        let cells: HashSet<_> = sensor
            .cone_cells(9, Position::new(4, 4), Direction::E)
            .into_iter()
            .collect();
        let expected: HashSet<_> = [Position::new(3, 5), Position::new(4, 5), Position::new(5, 5)]
            .into_iter()
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_northeast_quadrant_triangle() {
        let sensor = ConeSensor::new(2);
        let cells: HashSet<_> = sensor
            .cone_cells(9, Position::new(4, 4), Direction::NE)
            .into_iter()
            .collect();
        let expected: HashSet<_> = [
            Position::new(4, 5),
            Position::new(3, 4),
            Position::new(4, 6),
            Position::new(3, 5),
            Position::new(2, 4),
        ]
        .into_iter()
        .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_cone_clipped_at_edges() {
        let sensor = ConeSensor::new(3);
        assert!(sensor.cone_cells(8, Position::new(0, 0), Direction::N).is_empty());
        assert!(
            sensor
                .cone_cells(8, Position::new(0, 0), Direction::SE)
                .iter()
                .all(|p| p.row >= 0 && p.col >= 0)
        );
    }

    #[test]
    fn test_union_is_chebyshev_square() {
        let sensor = ConeSensor::new(3);
        let truth = Grid::filled(11, CellState::Walkable);
        let pose = Position::new(5, 5);
        let seen: HashSet<_> = sensor.visible_360(&truth, pose).into_iter().collect();
        assert_eq!(seen.len(), 49);
        assert!(seen.iter().all(|p| p.chebyshev_distance(&pose) <= 3));
    }

    #[test]
    fn test_wall_blocks_cells_behind_it() {
        let mut truth = Grid::filled(9, CellState::Walkable);
        truth.set(Position::new(3, 4), CellState::Wall);
        let sensor = ConeSensor::new(3);
        let seen = sensor.visible(&truth, Position::new(4, 4), Direction::N);

        assert!(seen.contains(&Position::new(4, 4)));
        assert!(seen.contains(&Position::new(3, 4)));
        assert!(!seen.contains(&Position::new(2, 4)));
        assert!(!seen.contains(&Position::new(1, 4)));
        assert!(seen.contains(&Position::new(3, 3)));
    }

    #[test]
    fn test_pose_cell_always_visible() {
        let truth = Grid::filled(4, CellState::Walkable);
        let sensor = ConeSensor::new(1);
        let seen = sensor.visible(&truth, Position::new(0, 0), Direction::N);
        assert_eq!(seen, vec![Position::new(0, 0)]);
    }
}

//! Sensor coverage overlay for diagnostics.

use super::Sensor;
use crate::core::{Direction, Position};
use crate::grid::Grid;

/// How one cell relates to the sensor cone at a pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// Inside the cone with clear line of sight
    Sensed,
    /// Inside the cone but occluded by a wall
    Blocked,
    /// Outside the cone
    OutOfRange,
}

impl Coverage {
    /// Glyph used in diagnostic windows
    pub fn as_char(self) -> char {
        match self {
            Coverage::Sensed => 'S',
            Coverage::Blocked => 'b',
            Coverage::OutOfRange => ' ',
        }
    }
}

/// Per-cell coverage of one sensor reading.
#[derive(Clone, Debug)]
pub struct SensorOverlay {
    pose: Position,
    heading: Direction,
    size: usize,
    cells: Vec<Coverage>,
}

impl SensorOverlay {
    /// Classify every cell of the grid for a reading at `pose` facing `heading`.
    pub fn capture<S>(sensor: &S, truth: &Grid, pose: Position, heading: Direction) -> Self
    where
        S: Sensor + ?Sized,
    {
        let size = truth.size();
        let mut cells = vec![Coverage::OutOfRange; size * size];

        for cell in sensor.footprint(size, pose, heading) {
            if let Some(i) = truth.index(cell) {
                cells[i] = Coverage::Blocked;
            }
        }
        for cell in sensor.visible(truth, pose, heading) {
            if let Some(i) = truth.index(cell) {
                cells[i] = Coverage::Sensed;
            }
        }

        Self {
            pose,
            heading,
            size,
            cells,
        }
    }

    /// Pose of the reading
    pub fn pose(&self) -> Position {
        self.pose
    }

    /// Heading of the reading
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Coverage of a cell (`OutOfRange` outside the grid)
    pub fn get(&self, pos: Position) -> Coverage {
        let n = self.size as i32;
        if !(0..n).contains(&pos.row) || !(0..n).contains(&pos.col) {
            return Coverage::OutOfRange;
        }
        self.cells[pos.row as usize * self.size + pos.col as usize]
    }

    /// Number of cells in a class
    pub fn count(&self, class: Coverage) -> usize {
        self.cells.iter().filter(|&&c| c == class).count()
    }
}

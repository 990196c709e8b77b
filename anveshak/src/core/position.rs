//! Integer cell positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Cell position as (row, col). Row grows southwards, col grows eastwards.
///
/// Ordering is row-major, which is the scan order used everywhere a
/// deterministic traversal is needed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Row index
    pub row: i32,
    /// Column index
    pub col: i32,
}

impl Position {
    /// Create a new position
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position
    #[inline]
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Chebyshev distance (max of row and col distance) - used for 8-connected grids
    #[inline]
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// Shift by a (row, col) delta
    #[inline]
    pub fn offset(&self, d_row: i32, d_col: i32) -> Position {
        Position::new(self.row + d_row, self.col + d_col)
    }

    /// Is `other` one of the 8 neighbours of this cell?
    #[inline]
    pub fn is_adjacent_8(&self, other: &Position) -> bool {
        self.chebyshev_distance(other) == 1
    }

    /// Is the step to `other` diagonal?
    #[inline]
    pub fn is_diagonal_step(&self, other: &Position) -> bool {
        self.row != other.row && self.col != other.col
    }

    /// The 8 neighbours, clockwise from north.
    #[inline]
    pub fn neighbors_8(&self) -> [Position; 8] {
        [
            self.offset(-1, 0),  // N
            self.offset(-1, 1),  // NE
            self.offset(0, 1),   // E
            self.offset(1, 1),   // SE
            self.offset(1, 0),   // S
            self.offset(1, -1),  // SW
            self.offset(0, -1),  // W
            self.offset(-1, -1), // NW
        ]
    }
}

impl Add for Position {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Position::new(self.row + other.row, self.col + other.col)
    }
}

impl Sub for Position {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Position::new(self.row - other.row, self.col - other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

//! Bresenham line rasterisation for line-of-sight checks.
//!
//! ```text
//! From (0,0) to (3,7) in (row, col):
//!
//!   col 0 1 2 3 4 5 6 7
//! row 0 ● ●
//!     1     ● ●
//!     2         ● ●
//!     3             ● ●
//! ```
//!
//! The rasterisation is integer-only and gap-free: consecutive cells are
//! 8-adjacent, both endpoints are included.

use crate::core::Position;

/// Bresenham's line algorithm iterator.
///
/// Yields every cell from `start` to `end`, both inclusive.
pub struct BresenhamLine {
    major: i32,
    minor: i32,
    d_major: i32,
    d_minor: i32,
    major_inc: i32,
    minor_inc: i32,
    error: i32,
    /// Major axis runs along rows
    steep: bool,
    end_major: i32,
    done: bool,
}

impl BresenhamLine {
    /// Create a new line iterator from start to end.
    pub fn new(start: Position, end: Position) -> Self {
        let d_row = (end.row - start.row).abs();
        let d_col = (end.col - start.col).abs();
        let steep = d_row > d_col;

        let (major, minor, end_major, end_minor, d_major, d_minor) = if steep {
            (start.row, start.col, end.row, end.col, d_row, d_col)
        } else {
            (start.col, start.row, end.col, end.row, d_col, d_row)
        };

        Self {
            major,
            minor,
            d_major,
            d_minor,
            major_inc: if end_major > major { 1 } else { -1 },
            minor_inc: if end_minor > minor { 1 } else { -1 },
            error: d_major / 2,
            steep,
            end_major,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = if self.steep {
            Position::new(self.major, self.minor)
        } else {
            Position::new(self.minor, self.major)
        };

        if self.major == self.end_major {
            self.done = true;
            return Some(result);
        }

        self.error -= self.d_minor;
        if self.error < 0 {
            self.minor += self.minor_inc;
            self.error += self.d_major;
        }
        self.major += self.major_inc;

        Some(result)
    }
}

/// Cells strictly between `start` and `end` on the rasterised line.
pub fn cells_between(start: Position, end: Position) -> impl Iterator<Item = Position> {
    BresenhamLine::new(start, end).filter(move |&p| p != start && p != end)
}

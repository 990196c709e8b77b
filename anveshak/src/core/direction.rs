//! Compass headings.
//!
//! Headings are numbered clockwise from north:
//!
//! ```text
//!   NW(7)  N(0)  NE(1)
//!   W(6)    R    E(2)
//!   SW(5)  S(4)  SE(3)
//! ```
//!
//! Rotation distance is computed modulo 8 and rotations always take the
//! shorter arc, clockwise when both arcs are four steps long.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Position;

/// One of the eight compass headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// North (row - 1)
    #[default]
    N = 0,
    /// North-east
    NE = 1,
    /// East (col + 1)
    E = 2,
    /// South-east
    SE = 3,
    /// South (row + 1)
    S = 4,
    /// South-west
    SW = 5,
    /// West (col - 1)
    W = 6,
    /// North-west
    NW = 7,
}

impl Direction {
    /// All headings in numbering order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Heading from its 0..7 index (taken modulo 8).
    #[inline]
    pub fn from_index(index: i32) -> Direction {
        Self::ALL[index.rem_euclid(8) as usize]
    }

    /// 0..7 index of this heading.
    #[inline]
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Unit (row, col) step for this heading.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }

    /// Is this one of NE, SE, SW, NW?
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Heading whose step has the same signs as (d_row, d_col).
    ///
    /// Returns `None` for a zero delta.
    pub fn from_delta(d_row: i32, d_col: i32) -> Option<Direction> {
        let step = (d_row.signum(), d_col.signum());
        Self::ALL.into_iter().find(|d| d.delta() == step)
    }

    /// Heading that points from `from` towards `to`.
    #[inline]
    pub fn toward(from: Position, to: Position) -> Option<Direction> {
        Self::from_delta(to.row - from.row, to.col - from.col)
    }

    /// Number of single steps between two headings along the shorter arc.
    pub fn rotation_distance(self, other: Direction) -> usize {
        let cw = (other.index() - self.index()).rem_euclid(8) as usize;
        cw.min(8 - cw)
    }

    /// Headings stepped through when rotating from `self` to `target`.
    ///
    /// Excludes the starting heading and ends with `target`; empty when the
    /// headings are equal.
    pub fn rotation_to(self, target: Direction) -> Vec<Direction> {
        let cw = (target.index() - self.index()).rem_euclid(8);
        if cw == 0 {
            return Vec::new();
        }
        let (step, count) = if cw <= 4 { (1, cw) } else { (-1, 8 - cw) };
        (1..=count)
            .map(|i| Direction::from_index(self.index() + step * i))
            .collect()
    }

    /// Short name (e.g. "NE")
    pub fn name(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }

    /// Arrow glyph used when rendering the robot.
    pub fn glyph(self) -> char {
        match self {
            Direction::N => '^',
            Direction::NE => '/',
            Direction::E => '>',
            Direction::SE => '\\',
            Direction::S => 'v',
            Direction::SW => '/',
            Direction::W => '<',
            Direction::NW => '\\',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

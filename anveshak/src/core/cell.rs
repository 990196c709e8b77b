//! Cell states shared by the ground-truth and known grids.
//!
//! The ground truth only ever holds `Wall` or `Walkable`. The known grid
//! starts `Unknown` everywhere and each cell moves at most once, to the
//! ground-truth value.

use serde::{Deserialize, Serialize};

/// Three-valued state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Not yet observed
    #[default]
    Unknown = 0,

    /// Open cell the robot may stand on
    Walkable = 1,

    /// Blocks movement and line of sight
    Wall = 2,
}

impl CellState {
    /// Can the robot stand on this cell?
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, CellState::Walkable)
    }

    /// Does this cell block line of sight?
    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, CellState::Wall)
    }

    /// Has this cell been observed?
    #[inline]
    pub fn is_known(self) -> bool {
        self != CellState::Unknown
    }

    /// Decode the maze-source encoding (0 = walkable, 1 = wall).
    #[inline]
    pub fn from_truth_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(CellState::Walkable),
            1 => Some(CellState::Wall),
            _ => None,
        }
    }

    /// Single character representation for dumps
    pub fn as_char(self) -> char {
        match self {
            CellState::Unknown => '?',
            CellState::Walkable => '.',
            CellState::Wall => '#',
        }
    }

    /// Inverse of [`CellState::as_char`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(CellState::Unknown),
            '.' => Some(CellState::Walkable),
            '#' => Some(CellState::Wall),
            _ => None,
        }
    }
}

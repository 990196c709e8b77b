//! Region tiling of the grid.
//!
//! ```text
//!  region_size = 4, grid = 8
//!
//!   col 0123 4567
//! row 0 ┌────┬────┐
//!       │0,0 │0,1 │
//!     4 ├────┼────┤
//!       │1,0 │1,1 │
//!       └────┴────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::core::Position;
use crate::error::ConfigError;

/// Region coordinates (Rr, Rc).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RegionCoord {
    /// Region row
    pub row: i32,
    /// Region column
    pub col: i32,
}

impl RegionCoord {
    /// Create a new region coordinate
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance in regions
    #[inline]
    pub fn chebyshev_distance(&self, other: &RegionCoord) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// Manhattan distance in regions
    #[inline]
    pub fn manhattan_distance(&self, other: &RegionCoord) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R({},{})", self.row, self.col)
    }
}

/// Maps cells to regions for a square grid split into square regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionLayout {
    grid_size: usize,
    region_size: usize,
}

impl RegionLayout {
    /// Create a layout; `grid_size` must be a positive multiple of `region_size`.
    pub fn new(grid_size: usize, region_size: usize) -> Result<Self, ConfigError> {
        if region_size == 0 {
            return Err(ConfigError::ZeroRegionSize);
        }
        if grid_size == 0 || grid_size % region_size != 0 {
            return Err(ConfigError::RegionMismatch {
                grid: grid_size,
                region: region_size,
            });
        }
        Ok(Self {
            grid_size,
            region_size,
        })
    }

    /// Grid edge length in cells
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Region edge length in cells
    #[inline]
    pub fn region_size(&self) -> usize {
        self.region_size
    }

    /// Regions along one edge of the grid
    #[inline]
    pub fn regions_per_side(&self) -> usize {
        self.grid_size / self.region_size
    }

    /// Region containing a cell (the cell must be inside the grid)
    #[inline]
    pub fn region_of(&self, pos: Position) -> RegionCoord {
        let r = self.region_size as i32;
        RegionCoord::new(pos.row.div_euclid(r), pos.col.div_euclid(r))
    }

    /// Is the region inside the grid?
    #[inline]
    pub fn contains(&self, region: RegionCoord) -> bool {
        let n = self.regions_per_side() as i32;
        (0..n).contains(&region.row) && (0..n).contains(&region.col)
    }

    /// Row and column ranges covered by a region
    pub fn bounds(&self, region: RegionCoord) -> (Range<i32>, Range<i32>) {
        let r = self.region_size as i32;
        (
            region.row * r..region.row * r + r,
            region.col * r..region.col * r + r,
        )
    }

    /// Cells of a region in row-major order
    pub fn cells(&self, region: RegionCoord) -> impl Iterator<Item = Position> {
        let (rows, cols) = self.bounds(region);
        rows.flat_map(move |row| cols.clone().map(move |col| Position::new(row, col)))
    }

    /// All regions in row-major order
    pub fn regions(&self) -> impl Iterator<Item = RegionCoord> {
        let n = self.regions_per_side() as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| RegionCoord::new(row, col)))
    }

    /// In-bounds regions within Chebyshev distance `radius` (including `region`)
    pub fn within(&self, region: RegionCoord, radius: i32) -> impl Iterator<Item = RegionCoord> {
        let layout = *self;
        (-radius..=radius).flat_map(move |dr| {
            (-radius..=radius)
                .map(move |dc| RegionCoord::new(region.row + dr, region.col + dc))
                .filter(move |r| layout.contains(*r))
        })
    }

    /// The in-bounds 8 neighbours of a region
    pub fn neighbors(&self, region: RegionCoord) -> impl Iterator<Item = RegionCoord> {
        self.within(region, 1).filter(move |r| *r != region)
    }

    /// Cells of `from` that have at least one 8-neighbour in the adjacent region `to`.
    ///
    /// `to` must be one of the 8 neighbours of `from`. Cells come back in
    /// row-major order: a full edge for side neighbours, one corner cell for
    /// diagonal neighbours.
    pub fn border_cells(&self, from: RegionCoord, to: RegionCoord) -> Vec<Position> {
        let (rows, cols) = self.bounds(from);
        let pick = |range: Range<i32>, delta: i32| match delta {
            -1 => range.start..range.start + 1,
            1 => range.end - 1..range.end,
            _ => range,
        };
        let rows = pick(rows, to.row - from.row);
        let cols = pick(cols, to.col - from.col);
        rows.flat_map(|row| cols.clone().map(move |col| Position::new(row, col)))
            .collect()
    }
}

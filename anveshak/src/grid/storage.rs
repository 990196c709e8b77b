//! Square cell grid used for both the ground truth and the known map.

use crate::core::{CellState, Position};

/// Square grid of [`CellState`] values, stored row-major.
///
/// The same type backs the two grids of the engine:
/// - ground truth, holding only `Wall` and `Walkable`
/// - the known map, starting `Unknown` everywhere
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Edge length in cells
    size: usize,
    /// Cell states, `size * size` entries
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a grid with every cell set to `fill`
    pub fn filled(size: usize, fill: CellState) -> Self {
        Self {
            size,
            cells: vec![fill; size * size],
        }
    }

    /// Create an all-unknown grid (the initial known map)
    pub fn unknown(size: usize) -> Self {
        Self::filled(size, CellState::Unknown)
    }

    /// Build a grid from row-major states.
    ///
    /// Returns `None` when `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<CellState>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, cells })
    }

    /// Edge length in cells
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if a position is within bounds
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.size
            && (pos.col as usize) < self.size
    }

    /// Linear index of a position, if in bounds
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.row as usize * self.size + pos.col as usize)
    }

    /// Position of a linear index
    #[inline]
    pub fn position(&self, index: usize) -> Position {
        Position::new((index / self.size) as i32, (index % self.size) as i32)
    }

    /// Cell state at a position (`None` outside the grid)
    #[inline]
    pub fn get(&self, pos: Position) -> Option<CellState> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Is the position inside the grid and walkable?
    #[inline]
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(CellState::is_walkable)
    }

    /// Is the position inside the grid and unknown?
    #[inline]
    pub fn is_unknown(&self, pos: Position) -> bool {
        self.get(pos) == Some(CellState::Unknown)
    }

    /// Set a cell. Returns false if the position is outside the grid.
    #[inline]
    pub fn set(&mut self, pos: Position, state: CellState) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    /// Raw row-major cell slice
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Count cells in a given state
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|i| self.position(i))
    }

    /// In-bounds 8-neighbours of a position, clockwise from north
    pub fn neighbors_8(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors_8().into_iter().filter(|n| self.in_bounds(*n))
    }

    /// Does any in-bounds 8-neighbour hold `state`?
    pub fn has_neighbor(&self, pos: Position, state: CellState) -> bool {
        self.neighbors_8(pos).any(|n| self.get(n) == Some(state))
    }

    /// Is this a frontier cell: walkable with at least one unknown 8-neighbour?
    #[inline]
    pub fn is_frontier(&self, pos: Position) -> bool {
        self.is_walkable(pos) && self.has_neighbor(pos, CellState::Unknown)
    }

    /// Render the whole grid using [`CellState::as_char`], one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.size);
        for row in self.cells.chunks(self.size.max(1)) {
            out.extend(row.iter().map(|c| c.as_char()));
            out.push('\n');
        }
        out
    }
}

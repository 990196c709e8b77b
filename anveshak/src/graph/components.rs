//! Per-region connected components and the colored map.
//!
//! Each region is flood-filled independently over known-walkable cells with
//! 8-adjacency. Components are numbered 0, 1, 2, ... in the row-major order
//! of their first cell, so the numbering depends only on the region's cells.

use std::collections::VecDeque;

use super::region::{RegionCoord, RegionLayout};
use crate::core::Position;
use crate::grid::Grid;

/// Colored-map value for cells that are not known-walkable.
pub const NO_COMPONENT: i32 = -1;

/// Auxiliary grid holding, for each known-walkable cell, the local id of its
/// component within its region, and [`NO_COMPONENT`] everywhere else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoredMap {
    size: usize,
    labels: Vec<i32>,
}

impl ColoredMap {
    /// Create a map with no components
    pub fn new(size: usize) -> Self {
        Self {
            size,
            labels: vec![NO_COMPONENT; size * size],
        }
    }

    /// Edge length in cells
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        let n = self.size as i32;
        ((0..n).contains(&pos.row) && (0..n).contains(&pos.col))
            .then(|| pos.row as usize * self.size + pos.col as usize)
    }

    /// Raw label (`-1` for no component or out of bounds)
    #[inline]
    pub fn raw(&self, pos: Position) -> i32 {
        self.index(pos).map_or(NO_COMPONENT, |i| self.labels[i])
    }

    /// Local component id of a cell, if it belongs to one
    #[inline]
    pub fn label(&self, pos: Position) -> Option<u32> {
        u32::try_from(self.raw(pos)).ok()
    }

    fn set(&mut self, pos: Position, label: i32) {
        if let Some(i) = self.index(pos) {
            self.labels[i] = label;
        }
    }

    /// Raw row-major labels
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Glyph for rendering: `0-9`, `a-z`, `A-Z`, `*` beyond that, `.` for none.
    pub fn glyph(&self, pos: Position) -> char {
        const GLYPHS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        match self.label(pos) {
            None => '.',
            Some(id) => GLYPHS.get(id as usize).map_or('*', |&b| b as char),
        }
    }
}

/// Flood-fill a region and relabel its cells in the colored map.
///
/// Returns the cells of each component indexed by local id, each list in
/// row-major order.
pub fn label_region(
    known: &Grid,
    layout: &RegionLayout,
    region: RegionCoord,
    colored: &mut ColoredMap,
) -> Vec<Vec<Position>> {
    for cell in layout.cells(region) {
        colored.set(cell, NO_COMPONENT);
    }

    let mut components: Vec<Vec<Position>> = Vec::new();
    let mut queue = VecDeque::new();

    for seed in layout.cells(region) {
        if !known.is_walkable(seed) || colored.label(seed).is_some() {
            continue;
        }

        let id = components.len() as i32;
        let mut cells = vec![seed];
        colored.set(seed, id);
        queue.push_back(seed);

        while let Some(cell) = queue.pop_front() {
            for next in cell.neighbors_8() {
                if layout.region_of(next) != region
                    || !known.is_walkable(next)
                    || colored.label(next).is_some()
                {
                    continue;
                }
                colored.set(next, id);
                cells.push(next);
                queue.push_back(next);
            }
        }

        cells.sort_unstable();
        components.push(cells);
    }

    components
}

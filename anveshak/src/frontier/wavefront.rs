//! Wavefront Frontier Detection (WFD).
//!
//! Two nested breadth-first searches:
//!
//! ```text
//!   outer BFS (map wavefront)       inner BFS (frontier group)
//!   seeded at the pose, walks   ──► started at every frontier cell the
//!   known-walkable cells with        outer BFS reaches that is not yet
//!   8-adjacency                      grouped; walks 8-adjacent frontier cells
//! ```
//!
//! The outer wavefront also records which cells are connected to the pose,
//! which the detector reuses to keep every surfaced target reachable.

use std::collections::VecDeque;

use super::types::FrontierGroup;
use crate::core::Position;
use crate::grid::Grid;

/// Result of one wavefront pass from the pose.
#[derive(Clone, Debug)]
pub struct Wavefront {
    size: usize,
    reached: Vec<bool>,
    reached_count: usize,
    groups: Vec<FrontierGroup>,
}

impl Wavefront {
    /// Run WFD over `known` from `start`.
    ///
    /// A start cell that is not known-walkable reaches nothing.
    pub fn scan(known: &Grid, start: Position) -> Self {
        let size = known.size();
        let mut reached = vec![false; size * size];
        let mut grouped = vec![false; size * size];
        let mut groups = Vec::new();
        let mut reached_count = 0;

        let Some(start_index) = known.index(start).filter(|_| known.is_walkable(start)) else {
            return Self {
                size,
                reached,
                reached_count,
                groups,
            };
        };

        let mut map_queue = VecDeque::from([start]);
        reached[start_index] = true;
        reached_count += 1;

        while let Some(cell) = map_queue.pop_front() {
            if let Some(i) = known.index(cell)
                && !grouped[i]
                && known.is_frontier(cell)
            {
                groups.push(Self::extract_group(known, cell, &mut grouped));
            }

            for next in known.neighbors_8(cell) {
                let Some(j) = known.index(next) else {
                    continue;
                };
                if !reached[j] && known.is_walkable(next) {
                    reached[j] = true;
                    reached_count += 1;
                    map_queue.push_back(next);
                }
            }
        }

        log::trace!(
            "[WFD] from {}: {} cells reached, {} groups",
            start,
            reached_count,
            groups.len()
        );

        Self {
            size,
            reached,
            reached_count,
            groups,
        }
    }

    fn extract_group(known: &Grid, seed: Position, grouped: &mut [bool]) -> FrontierGroup {
        let mut points = Vec::new();
        let mut queue = VecDeque::from([seed]);
        if let Some(i) = known.index(seed) {
            grouped[i] = true;
        }

        while let Some(cell) = queue.pop_front() {
            points.push(cell);
            for next in known.neighbors_8(cell) {
                let Some(j) = known.index(next) else {
                    continue;
                };
                if !grouped[j] && known.is_frontier(next) {
                    grouped[j] = true;
                    queue.push_back(next);
                }
            }
        }

        FrontierGroup::new(points)
    }

    /// Is `pos` connected to the start over known-walkable cells?
    #[inline]
    pub fn reaches(&self, pos: Position) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.row)
            && (0..n).contains(&pos.col)
            && self.reached[pos.row as usize * self.size + pos.col as usize]
    }

    /// Number of cells connected to the start
    #[inline]
    pub fn reached_count(&self) -> usize {
        self.reached_count
    }

    /// Frontier groups in discovery order
    #[inline]
    pub fn groups(&self) -> &[FrontierGroup] {
        &self.groups
    }

    /// Consume into the frontier groups
    pub fn into_groups(self) -> Vec<FrontierGroup> {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellState;

    fn known_from(rows: &[&str]) -> Grid {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| CellState::from_char(c).unwrap()))
            .collect();
        Grid::from_cells(rows.len(), cells).unwrap()
    }

    #[test]
    fn test_single_group_along_edge() {
        let known = known_from(&["????", "....", "....", "...."]);
        let wave = Wavefront::scan(&known, Position::new(3, 0));
        assert_eq!(wave.groups().len(), 1);
        assert_eq!(wave.groups()[0].len(), 4);
        assert_eq!(wave.reached_count(), 12);
    }

    #[test]
    fn test_two_separate_groups() {
        let known = known_from(&[
            "?....?", //
            "#....#",
            "#....#",
            "#....#",
            "#....#",
            "######",
        ]);
        let wave = Wavefront::scan(&known, Position::new(3, 2));
        // (0,1) and (1,1) border (0,0); (0,4) and (1,4) border (0,5)
        assert_eq!(wave.groups().len(), 2);
        for group in wave.groups() {
            assert_eq!(group.len(), 2);
        }

        let groups = wave.into_groups();
        let west = groups.iter().position(|g| g.points().contains(&Position::new(0, 1)));
        let east = groups.iter().position(|g| g.points().contains(&Position::new(0, 4)));
        assert!(west.is_some() && east.is_some());
        assert_ne!(west, east);
    }

    #[test]
    fn test_unreachable_frontier_is_ignored() {
        let known = known_from(&[
            "..#?", //
            "..#.",
            "###.",
            "....",
        ]);
        let wave = Wavefront::scan(&known, Position::new(0, 0));
        assert!(wave.groups().is_empty());
        assert!(!wave.reaches(Position::new(1, 3)));
        assert!(wave.reaches(Position::new(1, 1)));
    }

    #[test]
    fn test_start_not_walkable() {
        let known = known_from(&["?.", ".."]);
        let wave = Wavefront::scan(&known, Position::new(0, 0));
        assert_eq!(wave.reached_count(), 0);
        assert!(wave.groups().is_empty());
    }

    #[test]
    fn test_groups_grow_through_diagonals() {
        let known = known_from(&[
            "?#..", //
            "#...",
            "....",
            "....",
        ]);
        // (1,1) touches the unknown (0,0) diagonally
        let wave = Wavefront::scan(&known, Position::new(3, 3));
        assert_eq!(wave.groups().len(), 1);
        assert_eq!(wave.groups()[0].points(), &[Position::new(1, 1)]);
    }
}

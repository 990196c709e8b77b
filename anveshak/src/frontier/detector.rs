//! Frontier detection and frontier-to-component association.

use std::collections::HashSet;

use super::types::{Frontier, FrontierGroup, FrontierStrategy};
use super::wavefront::Wavefront;
use crate::core::Position;
use crate::graph::ComponentGraph;
use crate::grid::Grid;

/// Targets closer than this (Chebyshev cells) to the pose are suppressed.
pub const NEAR_POSE_RADIUS: f32 = 1.5;

/// Output of one detection pass.
#[derive(Clone, Debug, Default)]
pub struct FrontierScan {
    /// Targets surfaced to target selection, discovery order
    pub frontiers: Vec<Frontier>,
    /// Targets dropped for being within [`NEAR_POSE_RADIUS`] of the pose
    pub suppressed: Vec<Frontier>,
    /// Groups produced before reduction
    pub groups: usize,
}

impl FrontierScan {
    /// No surfaced and no suppressed frontiers
    pub fn is_exhausted(&self) -> bool {
        self.frontiers.is_empty() && self.suppressed.is_empty()
    }
}

/// Detects frontier groups and binds their representatives to components.
#[derive(Clone, Copy, Debug)]
pub struct FrontierDetector {
    strategy: FrontierStrategy,
    use_wfd: bool,
}

impl Default for FrontierDetector {
    fn default() -> Self {
        Self::new(FrontierStrategy::default(), true)
    }
}

impl FrontierDetector {
    /// Create a detector
    pub fn new(strategy: FrontierStrategy, use_wfd: bool) -> Self {
        Self { strategy, use_wfd }
    }

    /// Configured reduction strategy
    pub fn strategy(&self) -> FrontierStrategy {
        self.strategy
    }

    /// Detect frontiers around `pose`.
    ///
    /// With WFD enabled groups come from the wavefront; otherwise every
    /// frontier cell connected to the pose becomes its own group. Each group
    /// is reduced to a representative, snapped onto the group itself, and
    /// tagged with its component. Duplicate targets are dropped.
    pub fn detect(&self, known: &Grid, graph: &ComponentGraph, pose: Position) -> FrontierScan {
        let wave = Wavefront::scan(known, pose);
        let groups = if self.use_wfd {
            wave.into_groups()
        } else {
            fallback_groups(known, &wave)
        };

        let mut scan = FrontierScan {
            groups: groups.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for group in groups {
            let Some(target) = self.representative(&group) else {
                continue;
            };
            let Some(component) = graph.component_at(target) else {
                log::warn!("[Frontier] target {} has no component", target);
                continue;
            };
            if !seen.insert(target) {
                continue;
            }

            let frontier = Frontier {
                target,
                component,
                cells: group.points().to_vec(),
            };
            if (target.chebyshev_distance(&pose) as f32) < NEAR_POSE_RADIUS {
                scan.suppressed.push(frontier);
            } else {
                scan.frontiers.push(frontier);
            }
        }

        log::debug!(
            "[Frontier] {} groups -> {} frontiers ({} near pose)",
            scan.groups,
            scan.frontiers.len(),
            scan.suppressed.len()
        );
        scan
    }

    /// Reduce and snap a group to a target cell.
    ///
    /// A centroid can land on an unknown cell or on known floor behind the
    /// frontier; either way the nearest group cell stands in, so every
    /// target is itself a frontier cell.
    fn representative(&self, group: &FrontierGroup) -> Option<Position> {
        let raw = self.strategy.reduce(group)?;
        if group.points().contains(&raw) {
            Some(raw)
        } else {
            group.nearest_to(raw)
        }
    }
}

/// One single-cell group per frontier cell connected to the wavefront start,
/// row-major order.
fn fallback_groups(known: &Grid, wave: &Wavefront) -> Vec<FrontierGroup> {
    known
        .positions()
        .filter(|p| wave.reaches(*p) && known.is_frontier(*p))
        .map(|p| FrontierGroup::new(vec![p]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellState;
    use crate::graph::RegionLayout;

    fn known_from(rows: &[&str]) -> Grid {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| CellState::from_char(c).unwrap()))
            .collect();
        Grid::from_cells(rows.len(), cells).unwrap()
    }

    fn setup(rows: &[&str], region: usize) -> (Grid, ComponentGraph) {
        let known = known_from(rows);
        let layout = RegionLayout::new(rows.len(), region).unwrap();
        let graph = ComponentGraph::from_known(&known, layout);
        (known, graph)
    }

    const ROOM: &[&str] = &[
        "????????",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
    ];

    #[test]
    fn test_wfd_first_strategy() {
        let (known, graph) = setup(ROOM, 4);
        let detector = FrontierDetector::new(FrontierStrategy::First, true);
        let scan = detector.detect(&known, &graph, Position::new(7, 0));

        assert_eq!(scan.groups, 1);
        assert_eq!(scan.frontiers.len(), 1);
        let f = &scan.frontiers[0];
        assert_eq!(f.size(), 8);
        assert_eq!(f.target, f.cells[0]);
        assert_eq!(graph.component_at(f.target), Some(f.component));
    }

    #[test]
    fn test_centroid_on_unknown_cell_snaps_into_group() {
        // One group wrapping the unknown diagonal; its centroid is (2,2)
        let (known, graph) = setup(
            &[
                "?###....",
                ".?#.....",
                "..?.....",
                "........",
                "........",
                "........",
                "........",
                "........",
            ],
            8,
        );
        let detector = FrontierDetector::new(FrontierStrategy::Centroid, true);
        let scan = detector.detect(&known, &graph, Position::new(7, 7));

        assert_eq!(scan.frontiers.len(), 1);
        let f = &scan.frontiers[0];
        assert_ne!(f.target, Position::new(2, 2));
        assert!(f.cells.contains(&f.target));
        assert!(known.is_walkable(f.target));
        assert_eq!(f.target.chebyshev_distance(&Position::new(2, 2)), 1);
    }

    #[test]
    fn test_centroid_on_known_floor_snaps_onto_frontier() {
        // L-shaped group along row 1 and column 1; centroid (3,3) is plain floor
        let mut rows = vec!["????????"];
        rows.extend(std::iter::repeat_n("?.......", 7));
        let (known, graph) = setup(&rows, 4);
        let detector = FrontierDetector::new(FrontierStrategy::Centroid, true);
        let scan = detector.detect(&known, &graph, Position::new(7, 7));

        assert_eq!(scan.frontiers.len(), 1);
        let f = &scan.frontiers[0];
        assert_eq!(f.size(), 13);
        assert!(known.is_frontier(f.target));
        assert_eq!(f.target.chebyshev_distance(&Position::new(3, 3)), 2);
    }

    #[test]
    fn test_near_pose_targets_suppressed() {
        let (known, graph) = setup(ROOM, 4);
        let detector = FrontierDetector::new(FrontierStrategy::First, false);
        let scan = detector.detect(&known, &graph, Position::new(1, 3));

        // Fallback: one frontier per row-1 cell; cols 2..=4 are adjacent to the pose
        assert_eq!(scan.groups, 8);
        assert_eq!(scan.suppressed.len(), 3);
        assert_eq!(scan.frontiers.len(), 5);
        assert!(
            scan.frontiers
                .iter()
                .all(|f| f.target.chebyshev_distance(&Position::new(1, 3)) >= 2)
        );
    }

    #[test]
    fn test_fallback_skips_disconnected_cells() {
        let (known, graph) = setup(
            &[
                "????????",
                "....#...",
                "....#...",
                "#####...",
                "........",
                "........",
                "........",
                "........",
            ],
            4,
        );
        let detector = FrontierDetector::new(FrontierStrategy::First, false);
        let scan = detector.detect(&known, &graph, Position::new(1, 0));
        assert!(!scan.is_exhausted());
        assert!(
            scan.frontiers
                .iter()
                .chain(&scan.suppressed)
                .all(|f| f.target.col < 4)
        );
    }

    #[test]
    fn test_fully_known_map_has_no_frontiers() {
        let known = Grid::filled(8, CellState::Walkable);
        let graph = ComponentGraph::from_known(&known, RegionLayout::new(8, 4).unwrap());
        let scan = FrontierDetector::default().detect(&known, &graph, Position::new(0, 0));
        assert!(scan.is_exhausted());
        assert_eq!(scan.groups, 0);
    }
}

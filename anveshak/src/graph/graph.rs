//! Incrementally maintained component graph.
//!
//! ```text
//!   region (0,0)      region (0,1)
//!  ┌───────────┐     ┌───────────┐
//!  │  comp #0 ─┼─────┼─ comp #0  │   edge = at least one pair of
//!  │           │     │           │   8-adjacent walkable cells
//!  │  comp #1  │     │  comp #1  │   across the border
//!  └─────┬─────┘     └───────────┘
//!        │
//!  ┌─────┴─────┐
//!  │  comp #0  │   region (1,0)
//!  └───────────┘
//! ```
//!
//! Nodes are held in an ordered map keyed by [`ComponentKey`]; edges are
//! stored as keys on both endpoints, each backed by one or more
//! [`Transition`]s. When cells become walkable only the touched regions are
//! re-flooded, and links are rebuilt for regions within
//! [`RELINK_RADIUS`] of them. [`ComponentGraph::rebuild`] recomputes
//! everything and yields the same neighbour relation.

use std::collections::{BTreeMap, BTreeSet};

use super::components::{ColoredMap, label_region};
use super::node::{ComponentKey, ComponentNode, Transition};
use super::region::{RegionCoord, RegionLayout};
use crate::core::Position;
use crate::grid::Grid;

/// Regions within this Chebyshev distance of a dirty region get their links rebuilt.
pub const RELINK_RADIUS: i32 = 2;

/// Summary of one incremental update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphUpdate {
    /// Regions whose components were recomputed
    pub dirty_regions: Vec<RegionCoord>,
    /// Regions whose links were cleared and rescanned
    pub relinked_regions: usize,
    /// Component nodes created for the dirty regions
    pub nodes_rebuilt: usize,
    /// Directed transitions added by the border rescan
    pub transitions_added: usize,
}

impl GraphUpdate {
    /// Did the update change anything?
    pub fn is_empty(&self) -> bool {
        self.dirty_regions.is_empty()
    }
}

/// Graph of per-region components connected across region borders.
#[derive(Clone, Debug)]
pub struct ComponentGraph {
    layout: RegionLayout,
    nodes: BTreeMap<ComponentKey, ComponentNode>,
    colored: ColoredMap,
}

impl ComponentGraph {
    /// Create an empty graph (nothing known yet)
    pub fn new(layout: RegionLayout) -> Self {
        Self {
            layout,
            nodes: BTreeMap::new(),
            colored: ColoredMap::new(layout.grid_size()),
        }
    }

    /// Build a graph from scratch for a known map
    pub fn from_known(known: &Grid, layout: RegionLayout) -> Self {
        let mut graph = Self::new(layout);
        graph.rebuild(known);
        graph
    }

    /// Region layout
    #[inline]
    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    /// Colored map (local component id per cell)
    #[inline]
    pub fn colored(&self) -> &ColoredMap {
        &self.colored
    }

    /// Number of component nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no cell is known-walkable
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node
    #[inline]
    pub fn node(&self, key: ComponentKey) -> Option<&ComponentNode> {
        self.nodes.get(&key)
    }

    /// All nodes in key order
    pub fn nodes(&self) -> impl Iterator<Item = &ComponentNode> {
        self.nodes.values()
    }

    /// Nodes belonging to one region
    pub fn region_nodes(&self, region: RegionCoord) -> impl Iterator<Item = &ComponentNode> {
        self.nodes
            .range(ComponentKey::new(region, 0)..=ComponentKey::new(region, u32::MAX))
            .map(|(_, node)| node)
    }

    /// Component containing a cell
    #[inline]
    pub fn component_at(&self, pos: Position) -> Option<ComponentKey> {
        self.colored
            .label(pos)
            .map(|local| ComponentKey::new(self.layout.region_of(pos), local))
    }

    /// Does the component `key` contain `pos`?
    #[inline]
    pub fn contains_cell(&self, key: ComponentKey, pos: Position) -> bool {
        self.component_at(pos) == Some(key)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbors().len()).sum::<usize>() / 2
    }

    /// Total number of directed transitions
    pub fn transition_count(&self) -> usize {
        self.nodes.values().map(|n| n.transitions().len()).sum()
    }

    /// Neighbour relation as ordered (from, to) pairs
    pub fn neighbor_pairs(&self) -> BTreeSet<(ComponentKey, ComponentKey)> {
        self.nodes
            .values()
            .flat_map(|n| n.neighbors().iter().map(move |to| (n.key(), *to)))
            .collect()
    }

    /// All directed transitions as (from, to, from_cell, to_cell)
    pub fn transition_set(&self) -> BTreeSet<(ComponentKey, ComponentKey, Position, Position)> {
        self.nodes
            .values()
            .flat_map(|n| {
                n.transitions()
                    .iter()
                    .map(move |t| (n.key(), t.to, t.from_cell, t.to_cell))
            })
            .collect()
    }

    /// Patch the graph after `new_walkable` cells became known-walkable.
    ///
    /// 1. Dirty regions D = regions holding a new cell; their components are
    ///    recomputed from scratch.
    /// 2. D⁺ = regions within [`RELINK_RADIUS`] of D; their nodes lose all
    ///    links, and nodes outside D⁺ lose links pointing into D⁺.
    /// 3. Every region pair touching D⁺ is rescanned for border transitions.
    pub fn update(&mut self, known: &Grid, new_walkable: &[Position]) -> GraphUpdate {
        let layout = self.layout;
        let dirty: BTreeSet<RegionCoord> = new_walkable
            .iter()
            .filter(|p| known.in_bounds(**p))
            .map(|p| layout.region_of(*p))
            .collect();
        if dirty.is_empty() {
            return GraphUpdate::default();
        }

        let mut nodes_rebuilt = 0;
        for &region in &dirty {
            nodes_rebuilt += self.rebuild_region(known, region);
        }

        let expanded: BTreeSet<RegionCoord> = dirty
            .iter()
            .flat_map(|r| layout.within(*r, RELINK_RADIUS))
            .collect();

        for node in self.nodes.values_mut() {
            if expanded.contains(&node.key().region) {
                node.clear_links();
            } else {
                node.drop_links_where(|k| expanded.contains(&k.region));
            }
        }

        let pairs: BTreeSet<(RegionCoord, RegionCoord)> = expanded
            .iter()
            .flat_map(|&a| {
                layout
                    .neighbors(a)
                    .map(move |b| if a < b { (a, b) } else { (b, a) })
            })
            .collect();

        let mut transitions_added = 0;
        for (a, b) in pairs {
            transitions_added += self.link_regions(known, a, b);
        }

        log::debug!(
            "[Graph] update: {} new cells, {} dirty regions, {} relinked, {} nodes rebuilt, {} transitions",
            new_walkable.len(),
            dirty.len(),
            expanded.len(),
            nodes_rebuilt,
            transitions_added
        );

        GraphUpdate {
            dirty_regions: dirty.into_iter().collect(),
            relinked_regions: expanded.len(),
            nodes_rebuilt,
            transitions_added,
        }
    }

    /// Recompute every component and every link from the known map.
    pub fn rebuild(&mut self, known: &Grid) {
        let layout = self.layout;
        self.nodes.clear();
        self.colored = ColoredMap::new(layout.grid_size());

        for region in layout.regions() {
            self.rebuild_region(known, region);
        }
        for a in layout.regions() {
            for b in layout.neighbors(a).filter(|b| a < *b) {
                self.link_regions(known, a, b);
            }
        }

        log::debug!(
            "[Graph] full rebuild: {} nodes, {} edges",
            self.nodes.len(),
            self.edge_count()
        );
    }

    /// Replace a region's nodes with freshly flooded components.
    fn rebuild_region(&mut self, known: &Grid, region: RegionCoord) -> usize {
        let stale: Vec<ComponentKey> = self.region_nodes(region).map(|n| n.key()).collect();
        for key in stale {
            self.nodes.remove(&key);
        }

        let components = label_region(known, &self.layout, region, &mut self.colored);
        let count = components.len();
        for (local, cells) in components.into_iter().enumerate() {
            let key = ComponentKey::new(region, local as u32);
            self.nodes.insert(key, ComponentNode::new(key, cells));
        }
        count
    }

    /// Scan the border between two adjacent regions and add transitions.
    fn link_regions(&mut self, known: &Grid, a: RegionCoord, b: RegionCoord) -> usize {
        let mut added = 0;
        for from_cell in self.layout.border_cells(a, b) {
            if !known.is_walkable(from_cell) {
                continue;
            }
            let Some(from) = self.component_at(from_cell) else {
                continue;
            };
            for to_cell in from_cell.neighbors_8() {
                if !known.is_walkable(to_cell) || self.layout.region_of(to_cell) != b {
                    continue;
                }
                let Some(to) = self.component_at(to_cell) else {
                    continue;
                };
                added += self.add_link(from, to, from_cell, to_cell);
            }
        }
        added
    }

    /// Add a transition and its mirror.
    fn add_link(
        &mut self,
        from: ComponentKey,
        to: ComponentKey,
        from_cell: Position,
        to_cell: Position,
    ) -> usize {
        if !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            log::warn!("[Graph] colored map names missing node {} or {}", from, to);
            return 0;
        }

        let mut added = 0;
        if let Some(node) = self.nodes.get_mut(&from)
            && node.add_transition(Transition {
                to,
                from_cell,
                to_cell,
            })
        {
            added += 1;
        }
        if let Some(node) = self.nodes.get_mut(&to)
            && node.add_transition(Transition {
                to: from,
                from_cell: to_cell,
                to_cell: from_cell,
            })
        {
            added += 1;
        }
        added
    }

    /// Remove every link of a node (and the mirrored links).
    #[cfg(test)]
    pub(crate) fn detach(&mut self, key: ComponentKey) {
        for node in self.nodes.values_mut() {
            if node.key() == key {
                node.clear_links();
            } else {
                node.drop_links_where(|k| *k == key);
            }
        }
    }

    /// Remove the transitions between two nodes, leaving them neighbours.
    #[cfg(test)]
    pub(crate) fn cut_transitions(&mut self, a: ComponentKey, b: ComponentKey) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(node) = self.nodes.get_mut(&from) {
                node.drop_transitions_to(to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellState;

    fn open_known(size: usize) -> Grid {
        Grid::filled(size, CellState::Walkable)
    }

    fn key(rr: i32, rc: i32, local: u32) -> ComponentKey {
        ComponentKey::new(RegionCoord::new(rr, rc), local)
    }

    #[test]
    fn test_open_grid_has_one_node_per_region() {
        let layout = RegionLayout::new(16, 8).unwrap();
        let graph = ComponentGraph::from_known(&open_known(16), layout);

        assert_eq!(graph.len(), 4);
        // Every pair of the 2x2 regions touches (sides and the centre corner)
        assert_eq!(graph.edge_count(), 6);
        for node in graph.nodes() {
            assert_eq!(node.cells().len(), 64);
            assert_eq!(node.neighbors().len(), 3);
        }
    }

    #[test]
    fn test_diagonal_transition_across_corner() {
        let layout = RegionLayout::new(16, 8).unwrap();
        let graph = ComponentGraph::from_known(&open_known(16), layout);

        let nw = graph.node(key(0, 0, 0)).unwrap();
        let corner: Vec<_> = nw.transitions_to(key(1, 1, 0)).collect();
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].from_cell, Position::new(7, 7));
        assert_eq!(corner[0].to_cell, Position::new(8, 8));
    }

    #[test]
    fn test_side_transitions_count() {
        let layout = RegionLayout::new(16, 8).unwrap();
        let graph = ComponentGraph::from_known(&open_known(16), layout);

        // 8 border rows with 3 partners each, minus the one off the grid
        // edge and the one that falls into region (1,1)
        let nw = graph.node(key(0, 0, 0)).unwrap();
        assert_eq!(nw.transitions_to(key(0, 1, 0)).count(), 8 * 3 - 2);
    }

    #[test]
    fn test_corner_cutting_diagonal_link() {
        // Only (7,7) and (8,8) are walkable; the orthogonal cells are walls.
        let layout = RegionLayout::new(16, 8).unwrap();
        let mut known = Grid::unknown(16);
        known.set(Position::new(7, 7), CellState::Walkable);
        known.set(Position::new(8, 8), CellState::Walkable);
        known.set(Position::new(7, 8), CellState::Wall);
        known.set(Position::new(8, 7), CellState::Wall);

        let graph = ComponentGraph::from_known(&known, layout);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_incremental_matches_rebuild() {
        let layout = RegionLayout::new(24, 8).unwrap();
        let truth = open_known(24);
        let mut known = Grid::unknown(24);
        let mut graph = ComponentGraph::new(layout);

        let batches = [
            vec![Position::new(3, 3), Position::new(3, 4)],
            vec![Position::new(3, 5), Position::new(3, 6), Position::new(3, 7)],
            vec![Position::new(3, 8), Position::new(4, 9), Position::new(12, 12)],
            vec![Position::new(5, 10), Position::new(6, 11), Position::new(7, 12)],
            vec![
                Position::new(8, 12),
                Position::new(9, 12),
                Position::new(10, 12),
                Position::new(11, 12),
            ],
        ];

        for batch in batches {
            let changes = crate::grid::reveal(&mut known, &truth, batch);
            let walkable = crate::grid::walkable_changes(&changes);
            graph.update(&known, &walkable);

            let full = ComponentGraph::from_known(&known, layout);
            assert_eq!(graph.neighbor_pairs(), full.neighbor_pairs());
            assert_eq!(graph.transition_set(), full.transition_set());
            assert_eq!(graph.colored(), full.colored());
            assert!(graph.verify(&known).is_empty());
        }

        // The chain now runs from region (0,0) to region (1,1)
        let start = graph.component_at(Position::new(3, 3)).unwrap();
        let end = graph.component_at(Position::new(12, 12)).unwrap();
        assert!(graph.is_reachable(start, end));
    }

    #[test]
    fn test_update_replaces_split_component() {
        let layout = RegionLayout::new(16, 8).unwrap();
        let truth = open_known(16);
        let mut known = Grid::unknown(16);
        let mut graph = ComponentGraph::new(layout);

        // Two separate blobs in region (0,0)
        let changes = crate::grid::reveal(
            &mut known,
            &truth,
            [Position::new(0, 0), Position::new(0, 4)],
        );
        graph.update(&known, &crate::grid::walkable_changes(&changes));
        assert_eq!(graph.region_nodes(RegionCoord::new(0, 0)).count(), 2);

        // Bridge them
        let changes = crate::grid::reveal(
            &mut known,
            &truth,
            [Position::new(0, 1), Position::new(0, 2), Position::new(0, 3)],
        );
        let update = graph.update(&known, &crate::grid::walkable_changes(&changes));
        assert_eq!(update.dirty_regions, vec![RegionCoord::new(0, 0)]);
        assert_eq!(graph.region_nodes(RegionCoord::new(0, 0)).count(), 1);
        assert!(graph.node(key(0, 0, 1)).is_none());
    }

    #[test]
    fn test_empty_update_is_noop() {
        let layout = RegionLayout::new(16, 8).unwrap();
        let mut graph = ComponentGraph::new(layout);
        let update = graph.update(&Grid::unknown(16), &[]);
        assert!(update.is_empty());
        assert!(graph.is_empty());
    }
}

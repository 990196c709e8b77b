//! Component nodes and border transitions.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::region::RegionCoord;
use crate::core::Position;

/// Stable key of a component node: (Rr, Rc, local_id).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ComponentKey {
    /// Owning region
    pub region: RegionCoord,
    /// Component id within the region, in scan order
    pub local: u32,
}

impl ComponentKey {
    /// Create a new key
    #[inline]
    pub const fn new(region: RegionCoord, local: u32) -> Self {
        Self { region, local }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.region, self.local)
    }
}

/// A concrete walkable cell pair underlying a graph edge.
///
/// `from_cell` lies in the owning node, `to_cell` in `to`; the cells are
/// 8-adjacent and in different regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Neighbouring component
    pub to: ComponentKey,
    /// Cell on this side of the border
    pub from_cell: Position,
    /// Cell on the other side of the border
    pub to_cell: Position,
}

/// A maximal 8-connected set of known-walkable cells inside one region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentNode {
    key: ComponentKey,
    /// Cells in row-major order
    cells: Vec<Position>,
    /// Neighbouring nodes, in insertion order
    neighbors: IndexSet<ComponentKey>,
    /// Border transitions, in insertion order
    transitions: Vec<Transition>,
}

impl ComponentNode {
    pub(crate) fn new(key: ComponentKey, cells: Vec<Position>) -> Self {
        Self {
            key,
            cells,
            neighbors: IndexSet::new(),
            transitions: Vec::new(),
        }
    }

    /// Node key
    #[inline]
    pub fn key(&self) -> ComponentKey {
        self.key
    }

    /// Cells of this component, row-major
    #[inline]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Does the component contain this cell?
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.binary_search(&pos).is_ok()
    }

    /// Neighbouring nodes in insertion order
    #[inline]
    pub fn neighbors(&self) -> &IndexSet<ComponentKey> {
        &self.neighbors
    }

    /// All transitions in insertion order
    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Transitions leading into `to`
    pub fn transitions_to(&self, to: ComponentKey) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.to == to)
    }

    /// Add a transition, ignoring exact duplicates. Returns true if added.
    pub(crate) fn add_transition(&mut self, transition: Transition) -> bool {
        if self.transitions.contains(&transition) {
            return false;
        }
        self.neighbors.insert(transition.to);
        self.transitions.push(transition);
        true
    }

    pub(crate) fn clear_links(&mut self) {
        self.neighbors.clear();
        self.transitions.clear();
    }

    /// Drop every link whose far end satisfies `pred`.
    pub(crate) fn drop_links_where<F>(&mut self, pred: F)
    where
        F: Fn(&ComponentKey) -> bool,
    {
        self.transitions.retain(|t| !pred(&t.to));
        self.neighbors.retain(|k| !pred(k));
    }

    /// Drop the transitions into `to` but keep the neighbour entry.
    #[cfg(test)]
    pub(crate) fn drop_transitions_to(&mut self, to: ComponentKey) {
        self.transitions.retain(|t| t.to != to);
    }
}

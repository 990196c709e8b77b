//! Structural checks for the component graph.

use std::collections::BTreeSet;
use std::fmt;

use super::graph::ComponentGraph;
use super::node::{ComponentKey, Transition};
use crate::core::Position;
use crate::grid::Grid;

/// A broken graph invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphViolation {
    /// Known-walkable cell without a component
    UnassignedCell(Position),
    /// Colored-map label on a cell that is not known-walkable
    StaleLabel(Position),
    /// Node cell list and colored map disagree
    LabelMismatch {
        /// Offending cell
        position: Position,
        /// Node listing the cell
        key: ComponentKey,
    },
    /// Node links to itself
    SelfLoop(ComponentKey),
    /// `from` lists `to` as neighbour but not the other way round
    AsymmetricNeighbor {
        /// Listing node
        from: ComponentKey,
        /// Listed node
        to: ComponentKey,
    },
    /// Neighbour with no transition backing it
    MissingTransition {
        /// Listing node
        from: ComponentKey,
        /// Listed node
        to: ComponentKey,
    },
    /// Transition whose cells are not adjacent, not walkable or not owned by the endpoints
    BadTransition {
        /// Owning node
        from: ComponentKey,
        /// The transition
        transition: Transition,
    },
    /// Adjacent walkable cells across a border whose components are not neighbours
    MissingEdge {
        /// Component of the first cell
        a: ComponentKey,
        /// Component of the second cell
        b: ComponentKey,
    },
}

impl fmt::Display for GraphViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnassignedCell(p) => write!(f, "walkable cell {} has no component", p),
            Self::StaleLabel(p) => write!(f, "non-walkable cell {} carries a label", p),
            Self::LabelMismatch { position, key } => {
                write!(f, "cell {} listed by {} but labelled otherwise", position, key)
            }
            Self::SelfLoop(k) => write!(f, "{} links to itself", k),
            Self::AsymmetricNeighbor { from, to } => {
                write!(f, "{} -> {} has no reverse link", from, to)
            }
            Self::MissingTransition { from, to } => {
                write!(f, "{} -> {} has no transition", from, to)
            }
            Self::BadTransition { from, transition } => write!(
                f,
                "{} -> {} via {} -> {} is invalid",
                from, transition.to, transition.from_cell, transition.to_cell
            ),
            Self::MissingEdge { a, b } => write!(f, "{} and {} touch but are not linked", a, b),
        }
    }
}

impl ComponentGraph {
    /// Check partition, symmetry, transition validity and edge completeness
    /// against a known map. Returns every violation found.
    pub fn verify(&self, known: &Grid) -> Vec<GraphViolation> {
        let mut violations = Vec::new();
        let layout = self.layout();

        for pos in known.positions() {
            match (known.is_walkable(pos), self.component_at(pos)) {
                (true, None) => violations.push(GraphViolation::UnassignedCell(pos)),
                (false, Some(_)) => violations.push(GraphViolation::StaleLabel(pos)),
                (true, Some(key)) if !self.node(key).is_some_and(|n| n.contains(pos)) => {
                    violations.push(GraphViolation::UnassignedCell(pos))
                }
                _ => {}
            }
        }

        for node in self.nodes() {
            let key = node.key();
            for &cell in node.cells() {
                if !self.contains_cell(key, cell) {
                    violations.push(GraphViolation::LabelMismatch {
                        position: cell,
                        key,
                    });
                }
            }

            for &to in node.neighbors() {
                if to == key {
                    violations.push(GraphViolation::SelfLoop(key));
                    continue;
                }
                if !self.node(to).is_some_and(|n| n.neighbors().contains(&key)) {
                    violations.push(GraphViolation::AsymmetricNeighbor { from: key, to });
                }
                if node.transitions_to(to).next().is_none() {
                    violations.push(GraphViolation::MissingTransition { from: key, to });
                }
            }

            for t in node.transitions() {
                let valid = t.from_cell.is_adjacent_8(&t.to_cell)
                    && layout.region_of(t.from_cell) != layout.region_of(t.to_cell)
                    && known.is_walkable(t.from_cell)
                    && known.is_walkable(t.to_cell)
                    && node.contains(t.from_cell)
                    && self.contains_cell(t.to, t.to_cell)
                    && node.neighbors().contains(&t.to);
                if !valid {
                    violations.push(GraphViolation::BadTransition {
                        from: key,
                        transition: *t,
                    });
                }
            }
        }

        let mut missing = BTreeSet::new();
        for a in known.positions().filter(|p| known.is_walkable(*p)) {
            for b in known.neighbors_8(a) {
                if !known.is_walkable(b) || layout.region_of(a) == layout.region_of(b) {
                    continue;
                }
                if let (Some(ka), Some(kb)) = (self.component_at(a), self.component_at(b))
                    && !self.node(ka).is_some_and(|n| n.neighbors().contains(&kb))
                {
                    missing.insert((ka, kb));
                }
            }
        }
        violations.extend(
            missing
                .into_iter()
                .map(|(a, b)| GraphViolation::MissingEdge { a, b }),
        );

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellState;
    use crate::graph::RegionLayout;

    #[test]
    fn test_fresh_graph_is_valid() {
        let mut known = Grid::filled(16, CellState::Walkable);
        known.set(Position::new(4, 4), CellState::Wall);
        known.set(Position::new(12, 3), CellState::Unknown);
        let graph = ComponentGraph::from_known(&known, RegionLayout::new(16, 8).unwrap());
        assert!(graph.verify(&known).is_empty());
    }

    #[test]
    fn test_detached_node_reports_missing_edges() {
        let known = Grid::filled(16, CellState::Walkable);
        let mut graph = ComponentGraph::from_known(&known, RegionLayout::new(16, 8).unwrap());
        let key = graph.component_at(Position::new(0, 0)).unwrap();
        graph.detach(key);

        let violations = graph.verify(&known);
        assert!(!violations.is_empty());
        assert!(
            violations
                .iter()
                .all(|v| matches!(v, GraphViolation::MissingEdge { .. }))
        );
    }

    #[test]
    fn test_stale_known_map_is_flagged() {
        let known = Grid::filled(8, CellState::Walkable);
        let graph = ComponentGraph::from_known(&known, RegionLayout::new(8, 4).unwrap());

        let mut shrunk = known.clone();
        shrunk.set(Position::new(0, 0), CellState::Unknown);
        let violations = graph.verify(&shrunk);
        assert!(violations.contains(&GraphViolation::StaleLabel(Position::new(0, 0))));
    }
}

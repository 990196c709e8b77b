//! Breadth-first reachability over the component neighbour relation.

use indexmap::IndexMap;
use std::collections::VecDeque;

use super::graph::ComponentGraph;
use super::node::ComponentKey;

/// Result of a BFS from one component.
///
/// Visited nodes are kept in discovery order together with their BFS parent,
/// so the trace doubles as a shortest-hop path tree.
#[derive(Clone, Debug)]
pub struct Reachability {
    origin: ComponentKey,
    parents: IndexMap<ComponentKey, Option<ComponentKey>>,
}

impl Reachability {
    /// BFS start node
    #[inline]
    pub fn origin(&self) -> ComponentKey {
        self.origin
    }

    /// Was `key` reached?
    #[inline]
    pub fn contains(&self, key: ComponentKey) -> bool {
        self.parents.contains_key(&key)
    }

    /// Number of visited nodes (origin included)
    #[inline]
    pub fn visited_count(&self) -> usize {
        self.parents.len()
    }

    /// Visited nodes in discovery order
    pub fn visited(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.parents.keys().copied()
    }

    /// Hop path from the origin to `target`, both inclusive
    pub fn path_to(&self, target: ComponentKey) -> Option<Vec<ComponentKey>> {
        let mut path = vec![target];
        let mut current = *self.parents.get(&target)?;
        while let Some(parent) = current {
            path.push(parent);
            current = self.parents.get(&parent).copied().flatten();
        }
        path.reverse();
        Some(path)
    }
}

impl ComponentGraph {
    /// BFS over neighbours from `origin`.
    ///
    /// An origin that is not a node yields an empty trace.
    pub fn reachable_from(&self, origin: ComponentKey) -> Reachability {
        let mut parents = IndexMap::new();
        if self.node(origin).is_some() {
            parents.insert(origin, None);
            let mut queue = VecDeque::from([origin]);
            while let Some(key) = queue.pop_front() {
                let Some(node) = self.node(key) else {
                    continue;
                };
                for &next in node.neighbors() {
                    if !parents.contains_key(&next) {
                        parents.insert(next, Some(key));
                        queue.push_back(next);
                    }
                }
            }
        }
        Reachability { origin, parents }
    }

    /// Can `to` be reached from `from` over the neighbour relation?
    pub fn is_reachable(&self, from: ComponentKey, to: ComponentKey) -> bool {
        self.reachable_from(from).contains(to)
    }
}

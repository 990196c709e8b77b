//! Region decomposition and the incremental component graph.
//!
//! - [`RegionLayout`]: tiling of the grid into square regions
//! - [`label_region`] / [`ColoredMap`]: per-region 8-connected components
//! - [`ComponentGraph`]: nodes keyed by (region, local id) with border
//!   transitions, patched as cells are revealed
//! - [`Reachability`]: BFS over the neighbour relation
//! - [`GraphViolation`]: invariant checks used by tests and diagnostics

mod components;
#[allow(clippy::module_inception)]
mod graph;
mod node;
mod reachability;
mod region;
mod verify;

pub use components::{ColoredMap, NO_COMPONENT, label_region};
pub use graph::{ComponentGraph, GraphUpdate, RELINK_RADIUS};
pub use node::{ComponentKey, ComponentNode, Transition};
pub use reachability::Reachability;
pub use region::{RegionCoord, RegionLayout};
pub use verify::GraphViolation;

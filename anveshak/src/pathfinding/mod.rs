//! Hierarchical pathfinding over the partially known map.
//!
//! - [`HierarchicalPlanner`]: abstract A* on the component graph, refined
//!   per component and stitched through border transitions
//! - [`component_astar`]: 8-neighbour A* restricted to one component
//!
//! Both levels share one [`Heuristic`] and break cost ties by insertion
//! order, so identical inputs always produce identical paths.

mod astar;
mod hierarchical;
mod types;

pub use astar::component_astar;
pub use hierarchical::HierarchicalPlanner;
pub use types::{
    DIAGONAL_COST, HierarchicalPath, Heuristic, PathFailure, path_cost, step_cost,
};

//! # Anveshak: online exploration of unknown grids
//!
//! A robot with a forward cone sensor explores an N×N grid whose layout it
//! does not know. As cells are revealed the known map is tiled into square
//! regions, each region's walkable cells are split into 8-connected
//! components, and components touching across region borders are linked.
//! Only regions near newly revealed cells are recomputed.
//!
//! Frontiers (known walkable cells next to unknown ones) are grouped by a
//! wavefront flood from the robot, reduced to one target each, and reached
//! with hierarchical A*: an abstract search over components followed by
//! A* refinement inside each component.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anveshak::exploration::{ExplorationConfig, Explorer};
//! use anveshak::world::TextMaze;
//!
//! let world = TextMaze::from_file("maze.txt")?.parse()?;
//! let config = ExplorationConfig::default().with_sensor_range(10);
//! let summary = Explorer::new(&world, config)?.run()?;
//! println!("{}", summary);
//! # Ok::<(), anveshak::AnveshakError>(())
//! ```
//!
//! ## Layout
//!
//! - [`core`]: cell states, positions, compass headings
//! - [`grid`]: grid storage, Bresenham lines, known-map reveal
//! - [`sensor`]: cone sensor with line of sight
//! - [`graph`]: regions, components, the incremental component graph
//! - [`frontier`]: wavefront frontier detection
//! - [`pathfinding`]: in-component A* and hierarchical planning
//! - [`exploration`]: the exploration loop
//! - [`diagnostics`]: failure reports
//! - [`world`] / [`config`]: inputs

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod exploration;
pub mod frontier;
pub mod graph;
pub mod grid;
pub mod pathfinding;
pub mod sensor;
pub mod world;

pub use config::{AnveshakConfig, MazeConfig};
pub use self::core::{CellState, Direction, Position};
pub use error::{AnveshakError, ConfigError, ExplorationError, Result, WorldError};
pub use exploration::{
    ExplorationConfig, ExplorationSummary, ExploreStatus, Explorer, ProgressEvent,
    TerminationReason,
};
pub use graph::ComponentGraph;
pub use grid::Grid;
pub use world::{MazeSource, TextMaze, World};

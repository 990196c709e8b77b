//! Grid storage, line rasterisation and known-map updates.

pub mod raycaster;
mod storage;
mod update;

pub use raycaster::BresenhamLine;
pub use storage::Grid;
pub use update::{CellChange, reveal, walkable_changes};

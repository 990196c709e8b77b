//! Frontier detection.
//!
//! A frontier is a known-walkable cell with at least one unknown 8-neighbour.
//! [`FrontierDetector`] groups frontier cells (WFD or the per-cell fallback),
//! reduces each group to a target with a [`FrontierStrategy`] and tags the
//! target with its component.

mod detector;
mod types;
mod wavefront;

pub use detector::{FrontierDetector, FrontierScan, NEAR_POSE_RADIUS};
pub use types::{Frontier, FrontierGroup, FrontierStrategy};
pub use wavefront::Wavefront;

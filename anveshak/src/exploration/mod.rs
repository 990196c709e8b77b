//! Online exploration loop.
//!
//! - [`ExplorationConfig`]: recognised options with serde defaults
//! - [`Explorer`]: the per-iteration state machine, driven as an iterator
//! - [`ProgressEvent`] / [`ExploreStatus`]: what the iterator yields
//! - [`Trail`] / [`TargetHistory`]: anti-yoyo and loop detection state

mod config;
mod controller;
mod event;
mod history;

pub use config::{ExplorationConfig, MIN_HISTORY_CAPACITY};
pub use controller::Explorer;
pub use event::{ExplorationSummary, ExploreStatus, ProgressEvent, TerminationReason};
pub use history::{
    ANTI_YOYO_WINDOW, LOOP_REPEAT, LOOP_WINDOW, STALL_ITERATIONS, StallTracker, TargetHistory,
    Trail,
};

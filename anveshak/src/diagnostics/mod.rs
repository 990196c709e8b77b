//! Failure diagnostics.
//!
//! A [`DiagnosticReport`] is captured whenever the exploration loop hits an
//! invariant violation. It names the robot and target components, the
//! reachability BFS result, node connectivity listings, and text windows of
//! the known map, ground truth, colored map and sensor overlay.

mod report;
mod window;

pub use report::{ComponentDump, DiagnosticContext, DiagnosticKind, DiagnosticReport, WINDOW_RADIUS};
pub use window::MapWindow;

//! Exploration runs shared by the one-shot commands and the shell.

use anveshak::exploration::{ExplorationConfig, ExplorationSummary, ExploreStatus, Explorer};
use anveshak::{TerminationReason, World};

use crate::error::Result;
use crate::frames::{FrameBuffer, render};

/// Run the engine to completion, recording a frame per iteration.
///
/// On a fatal invariant violation the diagnostic block goes to stderr and
/// the error is returned.
pub fn explore(
    world: &World,
    config: ExplorationConfig,
    frames: &mut FrameBuffer,
) -> Result<ExplorationSummary> {
    let mut explorer = Explorer::new(world, config)?;
    frames.clear();

    let mut reason = TerminationReason::MaxIterations;
    while let Some(status) = explorer.next() {
        match status {
            ExploreStatus::InProgress(event) => {
                tracing::debug!(
                    "iteration {}: pose {}, coverage {:.1}%",
                    event.iteration,
                    event.pose,
                    event.coverage
                );
                frames.push(render(&event));
            }
            ExploreStatus::Complete(done) => reason = done,
            ExploreStatus::Failed(e) => {
                eprintln!("{}", e.report());
                return Err(e.into());
            }
        }
    }
    Ok(explorer.summary(reason))
}

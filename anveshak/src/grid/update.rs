//! Known-map update from a set of visible cells.

use serde::{Deserialize, Serialize};

use super::Grid;
use crate::core::{CellState, Position};

/// A cell whose known state changed during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    /// Changed cell
    pub position: Position,
    /// New known state (`Wall` or `Walkable`)
    pub state: CellState,
}

/// Copy ground-truth states into the known map for every visible cell.
///
/// Only `Unknown -> truth` transitions happen; re-reads of known cells and
/// out-of-bounds positions are ignored. Returns the changes in the order the
/// cells were first seen. The final known map does not depend on the order
/// of `visible`.
pub fn reveal<I>(known: &mut Grid, truth: &Grid, visible: I) -> Vec<CellChange>
where
    I: IntoIterator<Item = Position>,
{
    debug_assert_eq!(known.size(), truth.size());

    let mut changes = Vec::new();
    for position in visible {
        if !known.is_unknown(position) {
            continue;
        }
        let Some(state) = truth.get(position) else {
            continue;
        };
        if state.is_known() && known.set(position, state) {
            changes.push(CellChange { position, state });
        }
    }

    if !changes.is_empty() {
        log::trace!("[Grid] revealed {} cells", changes.len());
    }
    changes
}

/// Positions from `changes` that became walkable.
pub fn walkable_changes(changes: &[CellChange]) -> Vec<Position> {
    changes
        .iter()
        .filter(|c| c.state.is_walkable())
        .map(|c| c.position)
        .collect()
}

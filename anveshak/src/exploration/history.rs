//! Recent positions, target history and loop detection.
//!
//! - [`Trail`]: ring of recent poses, used for the oscillation pattern
//! - [`TargetHistory`]: replaced targets, used for anti-yoyo exclusion
//! - [`StallTracker`]: whether planned cost to the current target improves

use std::collections::VecDeque;

use crate::core::Position;

/// Targets in the last this-many history entries are never reselected.
pub const ANTI_YOYO_WINDOW: usize = 5;

/// Number of recent poses inspected for oscillation.
pub const LOOP_WINDOW: usize = 8;

/// A pose repeated this often inside the window counts as a loop.
pub const LOOP_REPEAT: usize = 4;

/// Iterations without cost improvement before progress counts as stalled.
pub const STALL_ITERATIONS: usize = 3;

/// Ring buffer of recent robot positions.
#[derive(Clone, Debug)]
pub struct Trail {
    positions: VecDeque<Position>,
    capacity: usize,
}

impl Trail {
    /// Create an empty trail holding at most `capacity` positions.
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a position, evicting the oldest when full.
    pub fn push(&mut self, pos: Position) {
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(pos);
    }

    /// Number of stored positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// No positions yet
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    /// Does the last [`LOOP_WINDOW`] positions look like oscillation?
    ///
    /// True when some position repeats [`LOOP_REPEAT`] times or only two
    /// distinct positions appear. Needs a full window.
    pub fn is_oscillating(&self) -> bool {
        if self.positions.len() < LOOP_WINDOW {
            return false;
        }
        let window: Vec<Position> = self
            .positions
            .iter()
            .skip(self.positions.len() - LOOP_WINDOW)
            .copied()
            .collect();

        let mut distinct: Vec<(Position, usize)> = Vec::new();
        for pos in window {
            match distinct.iter_mut().find(|(p, _)| *p == pos) {
                Some((_, count)) => *count += 1,
                None => distinct.push((pos, 1)),
            }
        }
        distinct.len() <= 2 || distinct.iter().any(|&(_, count)| count >= LOOP_REPEAT)
    }
}

/// Targets the robot has given up on or reached, oldest first.
#[derive(Clone, Debug)]
pub struct TargetHistory {
    targets: VecDeque<Position>,
    capacity: usize,
}

impl TargetHistory {
    /// Create an empty history holding at most `capacity` targets.
    pub fn new(capacity: usize) -> Self {
        Self {
            targets: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a replaced target.
    pub fn push(&mut self, target: Position) {
        if self.targets.len() == self.capacity {
            self.targets.pop_front();
        }
        self.targets.push_back(target);
    }

    /// Is `target` among the last [`ANTI_YOYO_WINDOW`] entries?
    pub fn is_recent(&self, target: Position) -> bool {
        self.targets.iter().rev().take(ANTI_YOYO_WINDOW).any(|&t| t == target)
    }

    /// Most recent entry
    pub fn last(&self) -> Option<Position> {
        self.targets.back().copied()
    }

    /// Number of stored targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// No targets yet
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.targets.iter().copied()
    }
}

/// Counts iterations in which the planned cost to one target did not improve.
#[derive(Clone, Debug, Default)]
pub struct StallTracker {
    target: Option<Position>,
    best_cost: f32,
    stalled: usize,
}

impl StallTracker {
    /// Record the planned cost to `target` for this iteration.
    ///
    /// A new target resets the counter. Returns the stall count.
    pub fn observe(&mut self, target: Position, cost: f32) -> usize {
        if self.target != Some(target) {
            self.target = Some(target);
            self.best_cost = cost;
            self.stalled = 0;
        } else if cost + 1e-4 < self.best_cost {
            self.best_cost = cost;
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.stalled
    }

    /// Forget the tracked target.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Has progress stalled for at least [`STALL_ITERATIONS`]?
    pub fn is_stalled(&self) -> bool {
        self.stalled >= STALL_ITERATIONS
    }
}

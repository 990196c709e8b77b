//! Shared world builders and run helpers for integration tests.

#![allow(dead_code)]

use anveshak::exploration::{ExplorationConfig, ExploreStatus, Explorer, ProgressEvent};
use anveshak::{CellState, Direction, ExplorationError, Grid, Position, TerminationReason, World};

/// Enable log output for a test run.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fully walkable N×N world.
pub fn open_world(size: usize, start: Position) -> World {
    World::new(Grid::filled(size, CellState::Walkable), start, Direction::N).unwrap()
}

/// Grid with the given cells walkable and everything else wall.
pub fn walls_except<I>(size: usize, walkable: I) -> Grid
where
    I: IntoIterator<Item = Position>,
{
    let mut grid = Grid::filled(size, CellState::Wall);
    for pos in walkable {
        grid.set(pos, CellState::Walkable);
    }
    grid
}

/// Cells of the inclusive rectangle `rows × cols`.
pub fn rect(
    rows: std::ops::RangeInclusive<i32>,
    cols: std::ops::RangeInclusive<i32>,
) -> impl Iterator<Item = Position> {
    rows.flat_map(move |r| cols.clone().map(move |c| Position::new(r, c)))
}

/// 32×32: rooms rows/cols 0..=14 and 16..=30 joined by the single cell (15,15).
pub fn two_rooms() -> World {
    let cells = rect(0..=14, 0..=14)
        .chain(rect(16..=30, 16..=30))
        .chain(std::iter::once(Position::new(15, 15)));
    World::new(walls_except(32, cells), Position::new(7, 7), Direction::N).unwrap()
}

/// Wall ring around the closed pocket in [`closed_pocket`].
pub const POCKET_RING: (std::ops::RangeInclusive<i32>, std::ops::RangeInclusive<i32>) =
    (26..=30, 26..=30);

/// 32×32 open area with a 3×3 pocket at (28,28) sealed by a wall ring.
pub fn closed_pocket() -> World {
    let mut truth = Grid::filled(32, CellState::Walkable);
    let (rows, cols) = POCKET_RING;
    for pos in rect(rows, cols) {
        let on_ring = pos.row == 26 || pos.row == 30 || pos.col == 26 || pos.col == 30;
        if on_ring {
            truth.set(pos, CellState::Wall);
        }
    }
    World::new(truth, Position::new(2, 2), Direction::N).unwrap()
}

/// 16×16 maze of corridors and dead ends, all connected.
pub const MAZE_16: &str = "\
################
#S.....#.......#
#.####.#.#####.#
#.#....#.#...#.#
#.#.####.#.#.#.#
#.#......#.#...#
#.######.#.#####
#......#...#...#
######.#####.#.#
#......#.....#.#
#.######.###.#.#
#.#....#...#...#
#.#.##.###.###.#
#...#......#...#
#####.####.....#
################
";

/// Parse [`MAZE_16`].
pub fn maze_16() -> World {
    anveshak::TextMaze::new(MAZE_16).parse().unwrap()
}

/// Everything one run produced.
pub struct Run {
    pub events: Vec<ProgressEvent>,
    pub outcome: Result<TerminationReason, ExplorationError>,
    pub explorer: Explorer,
}

impl Run {
    /// Termination reason, panicking on failure.
    pub fn reason(&self) -> TerminationReason {
        match &self.outcome {
            Ok(reason) => *reason,
            Err(e) => panic!("exploration failed: {}\n{}", e, e.report()),
        }
    }
}

/// Drive an explorer to completion, keeping every event.
pub fn run(world: &World, config: ExplorationConfig) -> Run {
    let mut explorer = Explorer::new(world, config).unwrap();
    let mut events = Vec::new();
    let mut outcome = Ok(TerminationReason::MaxIterations);
    for status in explorer.by_ref() {
        match status {
            ExploreStatus::InProgress(event) => events.push(*event),
            ExploreStatus::Complete(reason) => outcome = Ok(reason),
            ExploreStatus::Failed(e) => outcome = Err(e),
        }
    }
    Run {
        events,
        outcome,
        explorer,
    }
}

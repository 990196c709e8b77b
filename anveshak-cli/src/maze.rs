//! Random maze generation.
//!
//! Corridors are carved with an iterative recursive backtracker over the odd
//! cells, which yields a perfect maze (exactly one route between any two
//! cells). A fraction of the remaining interior walls that separate two
//! corridors is then knocked out to add loops. Knock-outs only ever join
//! corridors, so every walkable cell stays reachable from the start.

use anveshak::{CellState, Direction, Grid, MazeConfig, Position, World};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{CliError, Result};

/// Smallest grid that still has an interior to carve.
pub const MIN_SIZE: usize = 5;

/// Two-cell carving steps: N, E, S, W.
const STEPS: [(i32, i32); 4] = [(-2, 0), (0, 2), (2, 0), (0, -2)];

/// Generate a maze world. The robot starts at (1,1) facing north.
pub fn generate(config: &MazeConfig) -> Result<World> {
    let size = config.size;
    if size < MIN_SIZE {
        return Err(CliError::Maze(format!(
            "size {} is below the minimum of {}",
            size, MIN_SIZE
        )));
    }
    if !(0.0..=1.0).contains(&config.wall_density) {
        return Err(CliError::Maze(format!(
            "wall density {} is outside 0..=1",
            config.wall_density
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut truth = Grid::filled(size, CellState::Wall);
    let start = Position::new(1, 1);
    carve(&mut truth, start, &mut rng);
    let opened = knock_out(&mut truth, config.wall_density as f64, &mut rng);

    tracing::debug!(
        "generated {}x{} maze (seed {}): {} walkable cells, {} walls knocked out",
        size,
        size,
        config.seed,
        truth.count(CellState::Walkable),
        opened
    );

    Ok(World::new(truth, start, Direction::N)?)
}

fn is_interior(size: usize, pos: Position) -> bool {
    let last = size as i32 - 2;
    (1..=last).contains(&pos.row) && (1..=last).contains(&pos.col)
}

fn carve(truth: &mut Grid, start: Position, rng: &mut StdRng) {
    let size = truth.size();
    truth.set(start, CellState::Walkable);
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let options: Vec<Position> = STEPS
            .iter()
            .map(|&(dr, dc)| cell.offset(dr, dc))
            .filter(|&next| is_interior(size, next) && truth.get(next) == Some(CellState::Wall))
            .collect();

        let Some(&next) = options.choose(rng) else {
            stack.pop();
            continue;
        };
        let between = Position::new((cell.row + next.row) / 2, (cell.col + next.col) / 2);
        truth.set(between, CellState::Walkable);
        truth.set(next, CellState::Walkable);
        stack.push(next);
    }
}

/// Open interior walls that sit between two corridor cells.
fn knock_out(truth: &mut Grid, density: f64, rng: &mut StdRng) -> usize {
    if density <= 0.0 {
        return 0;
    }
    let size = truth.size();
    let candidates: Vec<Position> = truth
        .positions()
        .filter(|&pos| is_interior(size, pos) && truth.get(pos) == Some(CellState::Wall))
        .filter(|&pos| {
            let open = |dr, dc| truth.is_walkable(pos.offset(dr, dc));
            (open(-1, 0) && open(1, 0)) || (open(0, -1) && open(0, 1))
        })
        .collect();

    let mut opened = 0;
    for pos in candidates {
        if rng.random_bool(density) {
            truth.set(pos, CellState::Walkable);
            opened += 1;
        }
    }
    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    fn config(size: usize, seed: u64, wall_density: f32) -> MazeConfig {
        MazeConfig {
            size,
            seed,
            wall_density,
        }
    }

    fn reachable(world: &World) -> usize {
        let truth = world.truth();
        let mut seen = HashSet::from([world.start()]);
        let mut queue = VecDeque::from([world.start()]);
        while let Some(cell) = queue.pop_front() {
            for next in truth.neighbors_8(cell) {
                if truth.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate(&config(32, 7, 0.1)).unwrap();
        let b = generate(&config(32, 7, 0.1)).unwrap();
        let c = generate(&config(32, 8, 0.1)).unwrap();
        assert_eq!(a.to_text(), b.to_text());
        assert_ne!(a.to_text(), c.to_text());
    }

    #[test]
    fn test_every_walkable_cell_reachable() {
        for seed in 0..5 {
            for density in [0.0, 0.3] {
                let world = generate(&config(32, seed, density)).unwrap();
                assert_eq!(reachable(&world), world.walkable_count());
            }
        }
    }

    #[test]
    fn test_border_stays_wall() {
        let world = generate(&config(16, 3, 1.0)).unwrap();
        let truth = world.truth();
        for i in 0..16 {
            for pos in [
                Position::new(0, i),
                Position::new(15, i),
                Position::new(i, 0),
                Position::new(i, 15),
            ] {
                assert_eq!(truth.get(pos), Some(CellState::Wall), "{}", pos);
            }
        }
    }

    #[test]
    fn test_knock_outs_add_cells() {
        let plain = generate(&config(32, 11, 0.0)).unwrap();
        let open = generate(&config(32, 11, 0.5)).unwrap();
        assert!(open.walkable_count() > plain.walkable_count());
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(generate(&config(4, 1, 0.1)), Err(CliError::Maze(_))));
        assert!(matches!(generate(&config(16, 1, 1.5)), Err(CliError::Maze(_))));
    }
}

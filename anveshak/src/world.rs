//! Ground-truth worlds and maze sources.
//!
//! Text format, one row per line:
//!
//! ```text
//! ########
//! #S.....#
//! #.####.#
//! ########
//! ```
//!
//! `#` is a wall, `.` is walkable, `S` marks the walkable start cell.
//! Blank lines are ignored; every row must have as many cells as there are
//! rows.

use std::fs;
use std::path::Path;

use crate::core::{CellState, Direction, Position};
use crate::error::WorldError;
use crate::grid::Grid;

/// Provider of a ground-truth grid and initial pose.
pub trait MazeSource {
    /// Produce a validated world.
    fn world(&self) -> Result<World, WorldError>;
}

/// Ground truth plus the robot's initial pose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    truth: Grid,
    start: Position,
    heading: Direction,
}

impl World {
    /// Validate and wrap a ground-truth grid.
    ///
    /// The grid must contain only walls and walkable cells, and the start
    /// must be an in-bounds walkable cell.
    pub fn new(truth: Grid, start: Position, heading: Direction) -> Result<Self, WorldError> {
        if truth.size() == 0 {
            return Err(WorldError::Empty);
        }
        if let Some(index) = truth.cells().iter().position(|c| !c.is_known()) {
            return Err(WorldError::InvalidTruthValue { index, value: 2 });
        }
        match truth.get(start) {
            None => Err(WorldError::StartOutOfBounds(start)),
            Some(CellState::Walkable) => Ok(Self {
                truth,
                start,
                heading,
            }),
            Some(_) => Err(WorldError::StartOnWall(start)),
        }
    }

    /// Build from row-major truth bits (0 = walkable, 1 = wall).
    pub fn from_bits(
        size: usize,
        bits: &[u8],
        start: Position,
        heading: Direction,
    ) -> Result<Self, WorldError> {
        if size == 0 || bits.is_empty() {
            return Err(WorldError::Empty);
        }
        let cells = bits
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                CellState::from_truth_bit(value).ok_or(WorldError::InvalidTruthValue { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let found = cells.len();
        let truth = Grid::from_cells(size, cells).ok_or(WorldError::NotSquare {
            row: found / size,
            expected: size,
            found: found % size,
        })?;
        Self::new(truth, start, heading)
    }

    /// Ground truth grid
    pub fn truth(&self) -> &Grid {
        &self.truth
    }

    /// Initial pose
    pub fn start(&self) -> Position {
        self.start
    }

    /// Initial heading
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Grid edge length
    pub fn size(&self) -> usize {
        self.truth.size()
    }

    /// Number of walkable cells in the truth
    pub fn walkable_count(&self) -> usize {
        self.truth.count(CellState::Walkable)
    }

    /// Same world, different initial heading.
    pub fn with_heading(mut self, heading: Direction) -> Self {
        self.heading = heading;
        self
    }

    /// Render in the text maze format.
    pub fn to_text(&self) -> String {
        let size = self.truth.size();
        let mut out = String::with_capacity(size * (size + 1));
        for row in 0..size as i32 {
            for col in 0..size as i32 {
                let pos = Position::new(row, col);
                let c = if pos == self.start {
                    'S'
                } else {
                    self.truth.get(pos).map_or('#', |c| c.as_char())
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl MazeSource for World {
    fn world(&self) -> Result<World, WorldError> {
        Ok(self.clone())
    }
}

/// Maze in the text format, parsed on demand.
#[derive(Clone, Debug)]
pub struct TextMaze {
    text: String,
    heading: Direction,
}

impl TextMaze {
    /// Wrap maze text; the robot starts facing north.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: Direction::N,
        }
    }

    /// Read maze text from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    /// Initial heading for the parsed world.
    pub fn with_heading(mut self, heading: Direction) -> Self {
        self.heading = heading;
        self
    }

    /// Parse the text into a world.
    pub fn parse(&self) -> Result<World, WorldError> {
        let rows: Vec<&str> = self
            .text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(WorldError::Empty);
        }

        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        let mut start: Option<Position> = None;

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != size {
                return Err(WorldError::NotSquare {
                    row,
                    expected: size,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let state = match glyph {
                    '#' => CellState::Wall,
                    '.' => CellState::Walkable,
                    'S' => {
                        let here = Position::new(row as i32, col as i32);
                        if let Some(first) = start {
                            return Err(WorldError::MultipleStarts {
                                first,
                                second: here,
                            });
                        }
                        start = Some(here);
                        CellState::Walkable
                    }
                    _ => return Err(WorldError::UnknownGlyph { row, col, glyph }),
                };
                cells.push(state);
            }
        }

        let start = start.ok_or(WorldError::MissingStart)?;
        let truth = Grid::from_cells(size, cells).ok_or(WorldError::Empty)?;
        World::new(truth, start, self.heading)
    }
}

impl MazeSource for TextMaze {
    fn world(&self) -> Result<World, WorldError> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_maze() {
        let world = TextMaze::new("####\n#S.#\n#..#\n####\n").parse().unwrap();
        assert_eq!(world.size(), 4);
        assert_eq!(world.start(), Position::new(1, 1));
        assert_eq!(world.heading(), Direction::N);
        assert_eq!(world.walkable_count(), 4);
        assert_eq!(world.to_text(), "####\n#S.#\n#..#\n####\n");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(TextMaze::new("").parse(), Err(WorldError::Empty)));
        assert!(matches!(
            TextMaze::new("S.\n.").parse(),
            Err(WorldError::NotSquare { row: 1, .. })
        ));
        assert!(matches!(
            TextMaze::new("S.\n.x").parse(),
            Err(WorldError::UnknownGlyph { glyph: 'x', .. })
        ));
        assert!(matches!(
            TextMaze::new("..\n..").parse(),
            Err(WorldError::MissingStart)
        ));
        assert!(matches!(
            TextMaze::new("S.\n.S").parse(),
            Err(WorldError::MultipleStarts { .. })
        ));
    }

    #[test]
    fn test_from_bits_validation() {
        let ok = World::from_bits(2, &[0, 1, 0, 0], Position::new(0, 0), Direction::E);
        assert!(ok.is_ok());
        assert!(matches!(
            World::from_bits(2, &[0, 1, 0, 0], Position::new(0, 1), Direction::E),
            Err(WorldError::StartOnWall(_))
        ));
        assert!(matches!(
            World::from_bits(2, &[0, 1, 0, 0], Position::new(2, 0), Direction::E),
            Err(WorldError::StartOutOfBounds(_))
        ));
        assert!(matches!(
            World::from_bits(2, &[0, 3, 0, 0], Position::new(0, 0), Direction::E),
            Err(WorldError::InvalidTruthValue { index: 1, value: 3 })
        ));
    }
}

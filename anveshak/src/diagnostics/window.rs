//! Rectangular text windows over a grid.

use std::fmt;

use crate::core::Position;

/// A clipped square window of glyphs around a centre cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapWindow {
    /// Caption printed above the window
    pub title: String,
    /// Top-left cell of the window
    pub origin: Position,
    /// One string per row
    pub rows: Vec<String>,
}

impl MapWindow {
    /// Render the cells within `radius` of `center` (clipped to the grid).
    ///
    /// `marks` override the glyph of specific cells (pose, target, ...).
    pub fn capture<F>(
        title: impl Into<String>,
        size: usize,
        center: Position,
        radius: i32,
        marks: &[(Position, char)],
        glyph: F,
    ) -> Self
    where
        F: Fn(Position) -> char,
    {
        let max = size as i32 - 1;
        let row_start = (center.row - radius).max(0);
        let row_end = (center.row + radius).min(max);
        let col_start = (center.col - radius).max(0);
        let col_end = (center.col + radius).min(max);

        let rows = (row_start..=row_end)
            .map(|row| {
                (col_start..=col_end)
                    .map(|col| {
                        let pos = Position::new(row, col);
                        marks
                            .iter()
                            .find(|(p, _)| *p == pos)
                            .map_or_else(|| glyph(pos), |(_, c)| *c)
                    })
                    .collect()
            })
            .collect();

        Self {
            title: title.into(),
            origin: Position::new(row_start, col_start),
            rows,
        }
    }
}

impl fmt::Display for MapWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (top-left {})", self.title, self.origin)?;
        for row in &self.rows {
            writeln!(f, "  |{}|", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clips_at_corner() {
        let w = MapWindow::capture("t", 10, Position::new(0, 0), 2, &[], |_| '.');
        assert_eq!(w.origin, Position::new(0, 0));
        assert_eq!(w.rows.len(), 3);
        assert!(w.rows.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_marks_override_glyphs() {
        let w = MapWindow::capture(
            "t",
            10,
            Position::new(5, 5),
            1,
            &[(Position::new(5, 5), 'R')],
            |_| '.',
        );
        assert_eq!(w.rows, vec!["...", ".R.", "..."]);
        assert!(w.to_string().contains("|.R.|"));
    }
}

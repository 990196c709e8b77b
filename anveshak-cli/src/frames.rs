//! ASCII frames of exploration progress and a ring buffer to keep them in.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anveshak::diagnostics::MapWindow;
use anveshak::exploration::ProgressEvent;
use anveshak::{CellState, Position};

use crate::error::{CliError, Result};

/// Render one progress event as a full-map text frame.
///
/// Legend: heading arrow for the robot, `X` target, `F` other frontier
/// targets, `*` planned path, then the known map (`?` unknown).
pub fn render(event: &ProgressEvent) -> String {
    let size = event.known.size();
    let mut marks: Vec<(Position, char)> = vec![(event.pose, event.heading.glyph())];
    if let Some(target) = event.target {
        marks.push((target, 'X'));
    }
    marks.extend(event.frontiers.iter().map(|f| (f.target, 'F')));
    marks.extend(event.path.iter().map(|&p| (p, '*')));

    let title = format!(
        "iter {:>4}  pose {} {:<2}  coverage {:5.1}%  frontiers {}{}{}",
        event.iteration,
        event.pose,
        event.heading,
        event.coverage,
        event.frontiers.len(),
        if event.switched { "  switched" } else { "" },
        if event.stuck { "  stuck" } else { "" },
    );
    let centre = Position::new(size as i32 / 2, size as i32 / 2);
    let window = MapWindow::capture(title, size, centre, size as i32, &marks, |p| {
        event.known.get(p).unwrap_or(CellState::Unknown).as_char()
    });
    window.to_string()
}

/// The last `capacity` frames, oldest first.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    capacity: usize,
    frames: VecDeque<String>,
}

impl FrameBuffer {
    /// Create a buffer holding at most `capacity` frames (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a frame, evicting the oldest when full
    pub fn push(&mut self, frame: String) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<&str> {
        self.frames.back().map(String::as_str)
    }

    /// The newest `k` frames, oldest first.
    pub fn last(&self, k: usize) -> impl Iterator<Item = &str> {
        let skip = self.frames.len().saturating_sub(k);
        self.frames.iter().skip(skip).map(String::as_str)
    }

    /// Write the newest `k` frames to `path`, separated by blank lines.
    /// Returns the number of frames written.
    pub fn save(&self, path: &Path, k: usize) -> Result<usize> {
        let frames: Vec<&str> = self.last(k).collect();
        fs::write(path, frames.join("\n")).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("saved {} frames to {}", frames.len(), path.display());
        Ok(frames.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anveshak::exploration::{ExplorationConfig, ExploreStatus, Explorer};
    use anveshak::{Direction, Grid, World};

    #[test]
    fn test_ring_buffer_keeps_newest() {
        let mut buffer = FrameBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("frame {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.latest(), Some("frame 4"));
        let last: Vec<_> = buffer.last(2).collect();
        assert_eq!(last, vec!["frame 3", "frame 4"]);
        assert_eq!(buffer.last(10).count(), 3);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buffer = FrameBuffer::new(0);
        buffer.push("a".into());
        buffer.push("b".into());
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.latest(), Some("b"));
    }

    #[test]
    fn test_save_writes_frames() {
        let mut buffer = FrameBuffer::new(4);
        for i in 0..4 {
            buffer.push(format!("frame {}\n", i));
        }
        let path = std::env::temp_dir().join(format!("anveshak-frames-{}.txt", std::process::id()));
        assert_eq!(buffer.save(&path, 2).unwrap(), 2);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "frame 2\n\nframe 3\n");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_render_marks_pose() {
        let world = World::new(
            Grid::filled(8, CellState::Walkable),
            Position::new(4, 4),
            Direction::N,
        )
        .unwrap();
        let config = ExplorationConfig::default()
            .with_sensor_range(2)
            .with_region_size(4);
        let mut explorer = Explorer::new(&world, config).unwrap();
        let Some(ExploreStatus::InProgress(event)) = explorer.next() else {
            panic!("expected progress");
        };

        let frame = render(&event);
        let lines: Vec<&str> = frame.lines().collect();
        assert!(lines[0].starts_with("iter    0"));
        assert_eq!(lines.len(), 9);
        let row = lines[1 + event.pose.row as usize];
        let glyph = row.chars().nth(3 + event.pose.col as usize);
        assert_eq!(glyph, Some(event.heading.glyph()));
    }
}

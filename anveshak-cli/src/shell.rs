//! Line-oriented interactive shell.
//!
//! ```text
//! > generate 32 7
//! > explore
//! > save frames.txt 5
//! > quit
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use anveshak::{AnveshakConfig, MazeConfig, World};

use crate::error::Result;
use crate::frames::FrameBuffer;
use crate::{maze, session};

const HELP: &str = "\
commands:
  generate [size] [seed]   new random maze
  explore                  explore the current maze
  show                     print the latest frame
  save <file> [k]          write the last k frames (default: all kept)
  help                     this text
  quit                     leave";

/// What the shell should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Shell state: current maze, configuration and recorded frames.
pub struct Shell {
    config: AnveshakConfig,
    world: World,
    frames: FrameBuffer,
}

impl Shell {
    pub fn new(config: AnveshakConfig, frames: usize) -> Result<Self> {
        let world = maze::generate(&config.maze)?;
        Ok(Self {
            config,
            world,
            frames: FrameBuffer::new(frames),
        })
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            match self.execute(&line, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {}", e)?,
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };

        match command {
            "generate" => {
                let maze = MazeConfig {
                    size: parse_or(words.next(), self.config.maze.size)?,
                    seed: parse_or(words.next(), self.config.maze.seed)?,
                    ..self.config.maze.clone()
                };
                self.world = maze::generate(&maze)?;
                self.frames.clear();
                write!(out, "{}", self.world.to_text())?;
            }
            "explore" => {
                let config = self.config.exploration.clone();
                let summary = session::explore(&self.world, config, &mut self.frames)?;
                if let Some(frame) = self.frames.latest() {
                    write!(out, "{}", frame)?;
                }
                writeln!(out, "{}", summary)?;
            }
            "show" => match self.frames.latest() {
                Some(frame) => write!(out, "{}", frame)?,
                None => writeln!(out, "no frames yet")?,
            },
            "save" => {
                let Some(file) = words.next() else {
                    writeln!(out, "usage: save <file> [k]")?;
                    return Ok(Flow::Continue);
                };
                let k = parse_or(words.next(), self.frames.len())?;
                let written = self.frames.save(Path::new(file), k)?;
                writeln!(out, "wrote {} frames to {}", written, file)?;
            }
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(out, "unknown command '{}', try 'help'", other)?,
        }
        Ok(Flow::Continue)
    }
}

fn parse_or<T: std::str::FromStr>(word: Option<&str>, default: T) -> Result<T> {
    match word {
        None => Ok(default),
        Some(w) => w.parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("bad number '{}'", w)).into()
        }),
    }
}

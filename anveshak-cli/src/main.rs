//! Anveshak demo command line.
//!
//! # Usage
//!
//! ```bash
//! # Print a random 32x32 maze
//! anveshak generate --size 32 --seed 7
//!
//! # Explore a maze file and keep the last 20 frames
//! anveshak explore --maze maze.txt --frames 20 --save frames.txt
//!
//! # Interactive session
//! anveshak shell
//! ```
//!
//! Exit codes: 0 on normal termination, 1 for configuration, maze or I/O
//! errors, 2 when the engine aborts on a broken invariant (the diagnostic
//! block is printed to stderr). Set `RUST_LOG=anveshak=debug` for engine
//! internals.

mod error;
mod frames;
mod maze;
mod session;
mod shell;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anveshak::{AnveshakConfig, MazeSource, TextMaze, World};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use error::{CliError, Result};
use frames::FrameBuffer;
use shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "anveshak", version)]
#[command(about = "Explore unknown grid mazes with a hierarchical component graph")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of frames to keep
    #[arg(long, global = true, default_value = "10")]
    frames: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random maze
    Generate {
        /// Grid edge length (default from config)
        #[arg(long)]
        size: Option<usize>,

        /// RNG seed (default from config)
        #[arg(long)]
        seed: Option<u64>,

        /// Fraction of separating walls knocked out
        #[arg(long)]
        wall_density: Option<f32>,

        /// Write the maze here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Explore a maze file or a generated maze
    Explore {
        /// Maze text file
        #[arg(short, long, conflicts_with_all = ["size", "seed"])]
        maze: Option<PathBuf>,

        /// Generated maze edge length
        #[arg(long)]
        size: Option<usize>,

        /// Generated maze seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write the kept frames here
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Print only the summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive shell
    Shell,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anveshak=info,anveshak_cli=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            AnveshakConfig::load(path)?
        }
        None => AnveshakConfig::default(),
    };

    match args.command {
        Commands::Generate {
            size,
            seed,
            wall_density,
            output,
        } => {
            config.maze.size = size.unwrap_or(config.maze.size);
            config.maze.seed = seed.unwrap_or(config.maze.seed);
            config.maze.wall_density = wall_density.unwrap_or(config.maze.wall_density);
            let text = maze::generate(&config.maze)?.to_text();
            match output {
                Some(path) => {
                    fs::write(&path, text).map_err(|source| CliError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    info!("Wrote maze to {}", path.display());
                }
                None => print!("{}", text),
            }
        }

        Commands::Explore {
            maze,
            size,
            seed,
            save,
            quiet,
        } => {
            let world: World = match maze {
                Some(path) => TextMaze::from_file(path)?.world()?,
                None => {
                    config.maze.size = size.unwrap_or(config.maze.size);
                    config.maze.seed = seed.unwrap_or(config.maze.seed);
                    maze::generate(&config.maze)?
                }
            };
            info!(
                "Exploring {}x{} maze from {}",
                world.size(),
                world.size(),
                world.start()
            );

            let mut frames = FrameBuffer::new(args.frames);
            let summary = session::explore(&world, config.exploration, &mut frames)?;
            if !quiet && let Some(frame) = frames.latest() {
                print!("{}", frame);
            }
            println!("{}", summary);

            if let Some(path) = save {
                frames.save(&path, frames.len())?;
            }
        }

        Commands::Shell => {
            let mut shell = Shell::new(config, args.frames)?;
            shell.run(io::stdin().lock(), io::stdout())?;
        }
    }
    Ok(())
}

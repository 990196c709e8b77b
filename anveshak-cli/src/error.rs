//! Error types for the Anveshak command line

use std::path::PathBuf;

use anveshak::{AnveshakError, ConfigError, ExplorationError, WorldError};
use thiserror::Error;

/// Command line error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] AnveshakError),

    #[error("invalid maze settings: {0}")]
    Maze(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Engine(e) => e.exit_code(),
            _ => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Engine(e.into())
    }
}

impl From<WorldError> for CliError {
    fn from(e: WorldError) -> Self {
        CliError::Engine(e.into())
    }
}

impl From<ExplorationError> for CliError {
    fn from(e: ExplorationError) -> Self {
        CliError::Engine(e.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

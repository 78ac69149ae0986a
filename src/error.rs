//! Error types
//!
//! Configuration problems are reported and end the process cleanly; drawing
//! problems are logged and cost a single frame.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid settings or command line input
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tick rate '{0}': expected a positive whole number of ticks per second")]
    InvalidTickRate(String),

    #[error("failed to read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// A frame could not be copied to the visible output
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("no drawing context available")]
    Unavailable,

    #[error("terminal write failed")]
    Io(#[from] io::Error),
}

/// Top-level failure of the game binary
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal error")]
    Io(#[from] io::Error),

    #[error("game loop thread panicked")]
    LoopPanicked,
}

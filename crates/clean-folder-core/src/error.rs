use crate::mover::MoveFailure;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid root path '{}': {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to rename '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot rename '{}': '{}' already exists", from.display(), to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    #[error("{} file operation(s) failed", .0.len())]
    MoveFailed(Vec<MoveFailure>),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

//! Error types for the command-line front end.

use std::path::PathBuf;

/// All errors that can end a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid game settings: {0}")]
    Game(#[from] stocksim::ConfigError),

    #[error("saved state error: {0}")]
    Persistence(#[from] stocksim::PersistenceError),

    #[error("journal error: {0}")]
    Journal(#[source] std::io::Error),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

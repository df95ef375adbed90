use std::path::Path;

use thiserror::Error;

use crate::{
    cli::CliError,
    services::{aggregator::DaemonError, mpris::MediaError},
};

/// Error types for the musicwand application.
#[derive(Error, Debug)]
pub enum MusicwandError {
    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for the schema
    #[error("{0}")]
    TomlParse(String),

    /// Talking to a media player failed
    #[error(transparent)]
    Media(#[from] MediaError),

    /// The daemon failed to start
    #[error(transparent)]
    Daemon(#[from] DaemonError),

    /// A client command failed
    #[error(transparent)]
    Cli(#[from] CliError),
}

/// Result alias using [`MusicwandError`]
pub type Result<T> = std::result::Result<T, MusicwandError>;

impl MusicwandError {
    /// Creates a `TomlParse` error, naming the file when known
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                MusicwandError::TomlParse(format!(
                    "Failed to parse TOML at {}: {error}",
                    clean_path.display()
                ))
            }
            None => MusicwandError::TomlParse(format!("Failed to parse TOML: {error}")),
        }
    }
}

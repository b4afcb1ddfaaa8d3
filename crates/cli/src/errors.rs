use std::path::PathBuf;

use rental_furnish_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write session file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not remove session file {path}: {source}")]
    RemoveSession {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read from the terminal: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

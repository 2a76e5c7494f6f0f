//! Error types for readify

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReadifyError>;

#[derive(Error, Debug)]
pub enum ReadifyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Json {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ReadifyError {
    fn from(source: serde_json::Error) -> Self {
        ReadifyError::Json { path: None, source }
    }
}

impl ReadifyError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReadifyError::File {
            path: path.into(),
            source,
        }
    }
}

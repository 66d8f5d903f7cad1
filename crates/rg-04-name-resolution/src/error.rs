//! Error types for Name Resolution

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NameError {
    #[error("can't find name {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't encode name document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("name document unavailable: {0}")]
    Unavailable(String),
}

impl NameError {
    /// The name simply isn't mapped, as opposed to the backing store failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NameError::NotFound(_))
    }
}

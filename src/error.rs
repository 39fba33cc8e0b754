use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: DecodeError,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed archive: {0}")]
    Malformed(String),
}

impl ArchiveError {
    pub fn decode(context: impl Into<String>, source: DecodeError) -> Self {
        ArchiveError::Decode {
            context: context.into(),
            source,
        }
    }
}

pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Attach the archive path a failure belongs to
pub trait IntoArchiveError<T> {
    fn archive_context(self, context: &str) -> ArchiveResult<T>;
}

impl<T, E: std::fmt::Display> IntoArchiveError<T> for Result<T, E> {
    fn archive_context(self, context: &str) -> ArchiveResult<T> {
        self.map_err(|e| ArchiveError::Malformed(format!("{}: {}", context, e)))
    }
}

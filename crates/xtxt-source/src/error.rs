use std::path::PathBuf;

/// Errors that can occur while pulling buffers from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The input could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A read failed after `offset` bytes had been delivered.
    #[error("read failed at offset {offset}: {source}")]
    Read { offset: u64, source: std::io::Error },

    /// The requested buffer size cannot hold a single byte.
    #[error("buffer size must be at least 1 byte")]
    EmptyBuffer,
}

impl SourceError {
    /// The underlying I/O error, when there is one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            SourceError::Open { source, .. } | SourceError::Read { source, .. } => Some(source),
            SourceError::EmptyBuffer => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

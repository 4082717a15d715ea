/// Errors that can occur while demultiplexing an xtxt input.
#[derive(Debug, thiserror::Error)]
pub enum DemuxError {
    /// The byte source failed (open or read).
    #[error("source error: {0}")]
    Source(#[from] xtxt_source::SourceError),

    /// An escape byte was followed by an unknown marker code.
    #[error("invalid marker 0x{code:02X} at offset {offset}")]
    MalformedMarker { code: u8, offset: u64 },

    /// More stream-begin markers than the configured stream cap allows.
    #[error("too many streams (max {max})")]
    CapacityExceeded { max: usize },

    /// The input ended right after an escape byte (strict mode only).
    #[error("truncated marker: escape byte at offset {offset} has no marker code")]
    TruncatedMarker { offset: u64 },

    /// Input was pushed after a previous fatal error.
    #[error("demultiplexer aborted by an earlier error")]
    Aborted,
}

/// Errors that can occur while encoding an xtxt container.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Literal text contains the escape byte, which the format cannot carry.
    #[error("literal contains escape byte 0xFF at offset {offset}")]
    EscapeInLiteral { offset: usize },

    /// An I/O error occurred while writing.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DemuxError>;

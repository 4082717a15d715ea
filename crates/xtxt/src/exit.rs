use std::fmt;
use std::io;

use xtxt_demux::{DemuxError, EncodeError};
use xtxt_source::SourceError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn source_error(context: &str, err: SourceError) -> CliError {
    match err {
        SourceError::Open { path, source } => {
            io_error(&format!("{context}: cannot open {}", path.display()), source)
        }
        SourceError::Read { offset, source } => {
            io_error(&format!("{context}: read failed at offset {offset}"), source)
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn demux_error(context: &str, err: DemuxError) -> CliError {
    match err {
        DemuxError::Source(err) => source_error(context, err),
        DemuxError::MalformedMarker { .. }
        | DemuxError::CapacityExceeded { .. }
        | DemuxError::TruncatedMarker { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        DemuxError::Aborted => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn encode_error(context: &str, err: EncodeError) -> CliError {
    match err {
        EncodeError::Io(source) => io_error(context, source),
        EncodeError::EscapeInLiteral { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

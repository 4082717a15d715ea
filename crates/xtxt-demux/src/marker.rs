//! Wire-level marker bytes.

/// Escape byte that introduces every marker.
pub const ESCAPE: u8 = 0xFF;

/// Marker code for "next stream".
pub const STREAM_BEGIN: u8 = 0xFE;

/// Marker code for "next frame".
pub const FRAME_BEGIN: u8 = 0xFD;

/// Marker code for "next chunk".
pub const CHUNK_BEGIN: u8 = 0xFC;

/// Size of a marker on the wire (escape + code).
pub const MARKER_LEN: usize = 2;

/// A recognized marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    StreamBegin,
    FrameBegin,
    ChunkBegin,
}

impl Marker {
    /// Classify a marker code byte. Returns `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            STREAM_BEGIN => Some(Marker::StreamBegin),
            FRAME_BEGIN => Some(Marker::FrameBegin),
            CHUNK_BEGIN => Some(Marker::ChunkBegin),
            _ => None,
        }
    }

    /// The code byte that follows the escape.
    pub fn code(self) -> u8 {
        match self {
            Marker::StreamBegin => STREAM_BEGIN,
            Marker::FrameBegin => FRAME_BEGIN,
            Marker::ChunkBegin => CHUNK_BEGIN,
        }
    }

    /// Both wire bytes.
    pub fn to_bytes(self) -> [u8; MARKER_LEN] {
        [ESCAPE, self.code()]
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Marker::StreamBegin => "NSM",
            Marker::FrameBegin => "NFM",
            Marker::ChunkBegin => "NCM",
        }
    }
}

//! Streaming demultiplexer for the xtxt container format.
//!
//! An xtxt file interleaves several logical text streams using one escape
//! byte (`0xFF`) followed by a one-byte marker code:
//! - `FF FE` starts the next stream
//! - `FF FD` starts the next frame (counted globally)
//! - `FF FC` starts the next chunk (no-op boundary)
//!
//! Everything else is literal text. Files are decoded from fixed-size reads
//! and a marker may straddle two reads; the [`MarkerDecoder`] carries that
//! state across buffers and the [`Demultiplexer`] turns its events into a
//! [`StreamStore`] ready for rendering.

pub mod count;
pub mod decoder;
pub mod demux;
pub mod error;
pub mod marker;
pub mod render;
pub mod store;
pub mod writer;

pub use count::{count_frames, FrameCounter};
pub use decoder::{DecoderState, Event, Events, MarkerDecoder};
pub use demux::{
    demux_bytes, demux_file, demux_source, DemuxConfig, DemuxStats, Demultiplexer, Demuxed,
    DEFAULT_MAX_LINE_LEN, DEFAULT_MAX_STREAMS,
};
pub use error::{DemuxError, EncodeError, Result};
pub use marker::{Marker, ESCAPE};
pub use render::{render, render_to_string, RenderOptions, DEFAULT_COLUMN_WIDTH};
pub use store::{Line, Stream, StreamStore, StreamStoreBuilder};
pub use writer::{mux_streams, MuxSummary, XtxtWriter};

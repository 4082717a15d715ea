use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace, warn};
use xtxt_source::{ByteSource, ReaderSource, SliceSource, DEFAULT_BUFFER_SIZE};

use crate::decoder::{DecoderState, Event, MarkerDecoder};
use crate::error::{DemuxError, Result};
use crate::marker::MARKER_LEN;
use crate::store::{Line, StreamStore, StreamStoreBuilder};

/// Default hard cap on the number of streams.
pub const DEFAULT_MAX_STREAMS: usize = 128;

/// Default maximum line length: one less than the default read buffer.
pub const DEFAULT_MAX_LINE_LEN: usize = DEFAULT_BUFFER_SIZE - 1;

/// Configuration for a demux run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemuxConfig {
    /// Read buffer size in bytes. Default: 1024.
    pub buffer_size: usize,
    /// Longest literal run stored as a single line. Default: 1023.
    pub max_line_len: usize,
    /// Maximum number of streams, stream 0 included. Default: 128.
    pub max_streams: usize,
    /// When true, an escape byte with no marker code at end of input is an
    /// error instead of being dropped.
    pub strict: bool,
}

impl DemuxConfig {
    /// Default configuration with a different read buffer size.
    ///
    /// The line cap follows the buffer size, one byte short of it.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            max_line_len: buffer_size.saturating_sub(1).max(1),
            ..Self::default()
        }
    }
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_streams: DEFAULT_MAX_STREAMS,
            strict: false,
        }
    }
}

/// Counters collected while demultiplexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DemuxStats {
    /// Bytes consumed from the source.
    pub bytes: u64,
    /// Buffers consumed from the source.
    pub buffers: u64,
    pub stream_markers: u64,
    pub frame_markers: u64,
    pub chunk_markers: u64,
    /// Bytes stored in lines.
    pub literal_bytes: u64,
    /// Escape bytes dropped at end of input (0 or 1).
    pub dropped_bytes: u64,
}

impl DemuxStats {
    /// Total markers seen.
    pub fn markers(&self) -> u64 {
        self.stream_markers + self.frame_markers + self.chunk_markers
    }

    /// Bytes accounted for by lines, markers and a dropped escape.
    ///
    /// Equals `bytes` for any input that decoded without error.
    pub fn accounted_bytes(&self) -> u64 {
        self.literal_bytes + MARKER_LEN as u64 * self.markers() + self.dropped_bytes
    }
}

/// Result of a complete demux run.
#[derive(Debug, Clone)]
pub struct Demuxed {
    pub streams: StreamStore,
    /// Global frame counter.
    pub frames: u64,
    pub stats: DemuxStats,
}

/// Turns marker events into streams of lines.
///
/// Feed buffers in order with [`push`](Self::push), then call
/// [`finish`](Self::finish). After a fatal error the lines appended so far
/// stay readable through [`streams`](Self::streams) and further pushes fail
/// with [`DemuxError::Aborted`].
#[derive(Debug, Clone)]
pub struct Demultiplexer {
    decoder: MarkerDecoder,
    builder: StreamStoreBuilder,
    current: usize,
    frames: u64,
    stats: DemuxStats,
    config: DemuxConfig,
    failed: bool,
}

impl Demultiplexer {
    /// Create a demultiplexer with default configuration.
    pub fn new() -> Self {
        Self::with_config(DemuxConfig::default())
    }

    /// Create a demultiplexer with explicit configuration.
    pub fn with_config(config: DemuxConfig) -> Self {
        Self {
            decoder: MarkerDecoder::new(config.max_line_len),
            builder: StreamStoreBuilder::new(config.max_streams),
            current: 0,
            frames: 0,
            stats: DemuxStats::default(),
            config,
            failed: false,
        }
    }

    /// Decode and apply one buffer.
    pub fn push(&mut self, buf: &[u8]) -> Result<()> {
        if self.failed {
            return Err(DemuxError::Aborted);
        }
        if !buf.is_empty() {
            self.stats.buffers += 1;
            self.stats.bytes += buf.len() as u64;
        }

        let result = self.apply(buf);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn apply(&mut self, buf: &[u8]) -> Result<()> {
        for event in self.decoder.decode(buf) {
            match event {
                Event::Literal(bytes) => {
                    self.builder
                        .append_line(self.current, Line::copy_from_slice(bytes));
                    self.stats.literal_bytes += bytes.len() as u64;
                }
                Event::StreamBegin => {
                    self.stats.stream_markers += 1;
                    self.current = self.builder.open_stream()?;
                    debug!(stream = self.current, "stream begin");
                }
                Event::FrameBegin => {
                    self.stats.frame_markers += 1;
                    self.frames += 1;
                    trace!(frame = self.frames, "frame begin");
                }
                Event::ChunkBegin => {
                    self.stats.chunk_markers += 1;
                }
                Event::InvalidMarker { code, offset } => {
                    return Err(DemuxError::MalformedMarker { code, offset });
                }
            }
        }
        Ok(())
    }

    /// Flush the decoder and freeze the streams.
    pub fn finish(mut self) -> Result<Demuxed> {
        self.push(&[])?;

        if let DecoderState::EscapeSeen { offset } = self.decoder.state() {
            if self.config.strict {
                return Err(DemuxError::TruncatedMarker { offset });
            }
            warn!(offset, "dropping escape byte at end of input");
            self.stats.dropped_bytes += 1;
        }

        debug!(
            streams = self.builder.stream_count(),
            frames = self.frames,
            bytes = self.stats.bytes,
            "demux finished"
        );

        Ok(Demuxed {
            streams: self.builder.finish(),
            frames: self.frames,
            stats: self.stats,
        })
    }

    /// Index of the stream receiving lines.
    pub fn current_stream(&self) -> usize {
        self.current
    }

    /// Frame markers seen so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Streams built so far, including after a failure.
    pub fn streams(&self) -> &StreamStoreBuilder {
        &self.builder
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &DemuxStats {
        &self.stats
    }

    /// Decoder state carried into the next buffer.
    pub fn decoder_state(&self) -> DecoderState {
        self.decoder.state()
    }

    /// Settings this demultiplexer was built with.
    pub fn config(&self) -> &DemuxConfig {
        &self.config
    }
}

impl Default for Demultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Demultiplex everything a source delivers.
pub fn demux_source<S: ByteSource>(mut source: S, config: DemuxConfig) -> Result<Demuxed> {
    let mut demux = Demultiplexer::with_config(config);
    while let Some(buf) = source.next_buffer()? {
        demux.push(buf)?;
    }
    demux.finish()
}

/// Demultiplex a file read in `config.buffer_size` chunks.
pub fn demux_file(path: impl AsRef<Path>, config: DemuxConfig) -> Result<Demuxed> {
    let source = ReaderSource::open_with_buffer_size(path, config.buffer_size)?;
    demux_source(source, config)
}

/// Demultiplex an in-memory input split like a file of the same bytes.
pub fn demux_bytes(data: &[u8], config: DemuxConfig) -> Result<Demuxed> {
    let source = SliceSource::new(data, config.buffer_size)?;
    demux_source(source, config)
}

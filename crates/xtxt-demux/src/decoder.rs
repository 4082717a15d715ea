use crate::marker::{Marker, ESCAPE};

/// Decoder state carried from one buffer to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// Ready to accumulate literal bytes.
    Normal,
    /// The last byte of the previous buffer was an escape; the next byte is
    /// the marker code. `offset` is the absolute offset of the escape byte.
    EscapeSeen { offset: u64 },
}

/// A decoded unit of the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A run of non-escape bytes. Never empty.
    Literal(&'a [u8]),
    StreamBegin,
    FrameBegin,
    ChunkBegin,
    /// An escape followed by an unknown code. Always the last event.
    InvalidMarker { code: u8, offset: u64 },
}

impl Event<'_> {
    fn from_marker(marker: Marker) -> Self {
        match marker {
            Marker::StreamBegin => Event::StreamBegin,
            Marker::FrameBegin => Event::FrameBegin,
            Marker::ChunkBegin => Event::ChunkBegin,
        }
    }
}

/// Classifies a buffered byte stream into literal runs and markers.
///
/// Each call to [`decode`](Self::decode) scans one buffer. A literal run is
/// cut at the end of its buffer and at `max_literal` bytes; runs are never
/// joined across buffers. An escape that is the last byte of a buffer is held
/// in [`DecoderState::EscapeSeen`] and resolved by the first byte of the next
/// buffer.
#[derive(Debug, Clone)]
pub struct MarkerDecoder {
    state: DecoderState,
    position: u64,
    max_literal: usize,
}

impl MarkerDecoder {
    /// Create a decoder that cuts literal runs at `max_literal` bytes.
    pub fn new(max_literal: usize) -> Self {
        Self {
            state: DecoderState::Normal,
            position: 0,
            max_literal: max_literal.max(1),
        }
    }

    /// Current cross-buffer state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Absolute offset of the next byte to be decoded.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Maximum literal run length.
    pub fn max_literal(&self) -> usize {
        self.max_literal
    }

    /// Decode one buffer.
    ///
    /// The returned iterator must be drained before the next call so the
    /// state reflects the whole buffer. An empty buffer yields no events and
    /// leaves the state unchanged.
    pub fn decode<'d, 'a>(&'d mut self, buf: &'a [u8]) -> Events<'d, 'a> {
        Events {
            decoder: self,
            buf,
            pos: 0,
            done: false,
        }
    }
}

impl Default for MarkerDecoder {
    fn default() -> Self {
        Self::new(crate::demux::DEFAULT_MAX_LINE_LEN)
    }
}

/// Lazy event sequence over one buffer. See [`MarkerDecoder::decode`].
pub struct Events<'d, 'a> {
    decoder: &'d mut MarkerDecoder,
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Events<'_, 'a> {
    fn advance(&mut self, n: usize) {
        self.pos += n;
        self.decoder.position += n as u64;
    }

    fn marker(&mut self, code: u8, offset: u64) -> Event<'a> {
        match Marker::from_code(code) {
            Some(marker) => Event::from_marker(marker),
            None => {
                self.done = true;
                Event::InvalidMarker { code, offset }
            }
        }
    }
}

impl<'a> Iterator for Events<'_, 'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let buf = self.buf;
        if self.done || self.pos >= buf.len() {
            return None;
        }

        // Marker code deferred from the previous buffer.
        if let DecoderState::EscapeSeen { offset } = self.decoder.state {
            let code = buf[self.pos];
            self.advance(1);
            self.decoder.state = DecoderState::Normal;
            return Some(self.marker(code, offset));
        }

        if buf[self.pos] == ESCAPE {
            let offset = self.decoder.position;
            if self.pos + 1 >= buf.len() {
                self.advance(1);
                self.decoder.state = DecoderState::EscapeSeen { offset };
                return None;
            }
            let code = buf[self.pos + 1];
            self.advance(2);
            return Some(self.marker(code, offset));
        }

        let start = self.pos;
        let limit = buf.len().min(start.saturating_add(self.decoder.max_literal));
        let end = buf[start..limit]
            .iter()
            .position(|&b| b == ESCAPE)
            .map_or(limit, |i| start + i);
        self.advance(end - start);
        Some(Event::Literal(&buf[start..end]))
    }
}

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::error::{DemuxError, Result};

/// One literal run, as stored in a stream.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Line(Bytes);

impl Line {
    /// Copy a literal run into a new line.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Width in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The line as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl From<&[u8]> for Line {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from_slice(bytes)
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::copy_from_slice(text.as_bytes())
    }
}

impl AsRef<[u8]> for Line {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", self.to_string_lossy())
    }
}

/// An ordered sequence of lines plus its widest line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    lines: Vec<Line>,
    max_width: usize,
}

impl Stream {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Width in bytes of the longest line.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Total bytes across all lines.
    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    fn push(&mut self, line: Line) {
        self.max_width = self.max_width.max(line.len());
        self.lines.push(line);
    }
}

/// Stream table under construction.
///
/// Append-only. Stream 0 exists from the start; further streams are opened
/// in order up to `capacity`. Call [`finish`](Self::finish) to hand the
/// result to readers.
#[derive(Debug, Clone)]
pub struct StreamStoreBuilder {
    streams: Vec<Stream>,
    capacity: usize,
    longest: usize,
}

impl StreamStoreBuilder {
    /// Create a builder holding at most `capacity` streams (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            streams: vec![Stream::default()],
            capacity: capacity.max(1),
            longest: 0,
        }
    }

    /// Open the next stream and return its index.
    pub fn open_stream(&mut self) -> Result<usize> {
        let index = self.streams.len();
        if index >= self.capacity {
            return Err(DemuxError::CapacityExceeded { max: self.capacity });
        }
        self.streams.push(Stream::default());
        Ok(index)
    }

    /// Append a line to the stream at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was never opened.
    pub fn append_line(&mut self, index: usize, line: Line) {
        let stream = &mut self.streams[index];
        stream.push(line);
        self.longest = self.longest.max(stream.line_count());
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn stream(&self, index: usize) -> Option<&Stream> {
        self.streams.get(index)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Line count of the longest stream.
    pub fn longest_stream(&self) -> usize {
        self.longest
    }

    /// Freeze the table.
    pub fn finish(self) -> StreamStore {
        StreamStore {
            streams: self.streams,
            longest: self.longest,
        }
    }
}

/// Finished, read-only stream table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStore {
    streams: Vec<Stream>,
    longest: usize,
}

impl StreamStore {
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn stream(&self, index: usize) -> Option<&Stream> {
        self.streams.get(index)
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Line count of the longest stream; the renderer's row bound.
    pub fn longest_stream(&self) -> usize {
        self.longest
    }

    /// Line at `row` of stream `index`, if both exist.
    pub fn line(&self, index: usize, row: usize) -> Option<&Line> {
        self.streams.get(index).and_then(|s| s.line(row))
    }

    /// Total lines across all streams.
    pub fn line_count(&self) -> usize {
        self.streams.iter().map(Stream::line_count).sum()
    }

    /// Total literal bytes across all streams.
    pub fn byte_len(&self) -> usize {
        self.streams.iter().map(Stream::byte_len).sum()
    }
}

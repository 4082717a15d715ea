use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Result, SourceError};
use crate::traits::ByteSource;

/// Default read buffer size: 1 KiB.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Fills fixed-size buffers from any `Read` stream.
///
/// Short reads are retried until the buffer is full or the reader reports
/// EOF, so every buffer except the last has exactly `buffer_size` bytes no
/// matter how the underlying reader chunks its data.
pub struct ReaderSource<R> {
    inner: R,
    buf: Vec<u8>,
    offset: u64,
    finished: bool,
}

impl ReaderSource<File> {
    /// Open a file with the default buffer size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Open a file with an explicit buffer size.
    pub fn open_with_buffer_size(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, buffer_size, "opened input");
        Self::with_buffer_size(file, buffer_size)
    }
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader with the default buffer size.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; DEFAULT_BUFFER_SIZE],
            offset: 0,
            finished: false,
        }
    }

    /// Wrap a reader with an explicit buffer size.
    pub fn with_buffer_size(inner: R, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(SourceError::EmptyBuffer);
        }
        Ok(Self {
            inner,
            buf: vec![0u8; buffer_size],
            offset: 0,
            finished: false,
        })
    }

    /// Configured buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the source and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> Result<usize> {
        let mut filled = 0usize;
        while filled < self.buf.len() {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    self.finished = true;
                    return Err(SourceError::Read {
                        offset: self.offset + filled as u64,
                        source,
                    });
                }
            }
        }
        Ok(filled)
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_buffer(&mut self) -> Result<Option<&[u8]>> {
        if self.finished {
            return Ok(None);
        }

        let filled = self.fill()?;
        if filled == 0 {
            self.finished = true;
            return Ok(None);
        }

        trace!(offset = self.offset, len = filled, "buffer read");
        self.offset += filled as u64;
        Ok(Some(&self.buf[..filled]))
    }

    fn offset(&self) -> u64 {
        self.offset
    }
}

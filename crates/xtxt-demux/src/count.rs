//! Byte-pattern frame counter.
//!
//! Counts `FF FD` pairs without decoding markers. Pairs are matched across
//! buffer boundaries by carrying the previous byte. Malformed input is not
//! detected here; use the [`Demultiplexer`](crate::Demultiplexer) for that.

use xtxt_source::ByteSource;

use crate::error::Result;
use crate::marker::{ESCAPE, FRAME_BEGIN};

/// Running `FF FD` pair counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounter {
    prev: Option<u8>,
    frames: u64,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one buffer.
    pub fn feed(&mut self, buf: &[u8]) {
        for &byte in buf {
            if self.prev == Some(ESCAPE) && byte == FRAME_BEGIN {
                self.frames += 1;
            }
            self.prev = Some(byte);
        }
    }

    /// Pairs counted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Count `FF FD` pairs in everything a source delivers.
pub fn count_frames<S: ByteSource>(mut source: S) -> Result<u64> {
    let mut counter = FrameCounter::new();
    while let Some(buf) = source.next_buffer()? {
        counter.feed(buf);
    }
    Ok(counter.frames())
}

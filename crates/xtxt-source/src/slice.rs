use crate::error::{Result, SourceError};
use crate::traits::ByteSource;

/// Replays an in-memory input as a sequence of buffers.
///
/// Buffer sizes come from a split plan that is cycled until the input is
/// exhausted. A fixed size gives the same boundaries as [`ReaderSource`]
/// over the same bytes.
///
/// [`ReaderSource`]: crate::ReaderSource
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    plan: Vec<usize>,
    step: usize,
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Split `data` into buffers of `buffer_size` bytes.
    pub fn new(data: &'a [u8], buffer_size: usize) -> Result<Self> {
        Self::with_plan(data, vec![buffer_size])
    }

    /// Split `data` following `plan`, cycling through it as needed.
    ///
    /// Every entry must be non-zero.
    pub fn with_plan(data: &'a [u8], plan: Vec<usize>) -> Result<Self> {
        if plan.is_empty() || plan.contains(&0) {
            return Err(SourceError::EmptyBuffer);
        }
        Ok(Self {
            data,
            plan,
            step: 0,
            pos: 0,
        })
    }

    /// Bytes not yet delivered.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_buffer(&mut self) -> Result<Option<&[u8]>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        let size = self.plan[self.step % self.plan.len()];
        self.step += 1;

        let end = (self.pos + size).min(self.data.len());
        let buf = &self.data[self.pos..end];
        self.pos = end;
        Ok(Some(buf))
    }

    fn offset(&self) -> u64 {
        self.pos as u64
    }
}

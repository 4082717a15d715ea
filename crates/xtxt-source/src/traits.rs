use crate::error::Result;

/// A sequential supplier of byte buffers.
///
/// `Ok(None)` signals end of input. Once a source has returned `Ok(None)` or
/// an error, further calls keep returning `Ok(None)`.
pub trait ByteSource {
    /// Next buffer of input, or `None` at end of input.
    fn next_buffer(&mut self) -> Result<Option<&[u8]>>;

    /// Total number of bytes delivered so far.
    fn offset(&self) -> u64;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_buffer(&mut self) -> Result<Option<&[u8]>> {
        (**self).next_buffer()
    }

    fn offset(&self) -> u64 {
        (**self).offset()
    }
}

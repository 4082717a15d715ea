use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};
use serde::Serialize;
use tracing::debug;

use crate::error::EncodeError;
use crate::marker::{Marker, ESCAPE};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes an xtxt container to any `Write` stream.
///
/// Literal text is written as-is; markers are written as escape + code. The
/// format has no way to carry a literal `0xFF`, so such input is rejected.
pub struct XtxtWriter<T> {
    inner: T,
    buf: BytesMut,
    written: u64,
}

impl<T: Write> XtxtWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            written: 0,
        }
    }

    /// Write a literal run.
    pub fn write_literal(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        if let Some(offset) = bytes.iter().position(|&b| b == ESCAPE) {
            return Err(EncodeError::EscapeInLiteral { offset });
        }
        self.buf.clear();
        self.buf.put_slice(bytes);
        self.write_buf()
    }

    /// Write a two-byte marker.
    pub fn write_marker(&mut self, marker: Marker) -> Result<(), EncodeError> {
        self.buf.clear();
        self.buf.put_slice(&marker.to_bytes());
        self.write_buf()
    }

    pub fn begin_stream(&mut self) -> Result<(), EncodeError> {
        self.write_marker(Marker::StreamBegin)
    }

    pub fn begin_frame(&mut self) -> Result<(), EncodeError> {
        self.write_marker(Marker::FrameBegin)
    }

    pub fn begin_chunk(&mut self) -> Result<(), EncodeError> {
        self.write_marker(Marker::ChunkBegin)
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn write_buf(&mut self) -> Result<(), EncodeError> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(EncodeError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EncodeError::Io(err)),
            }
        }
        self.written += offset as u64;
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<(), EncodeError> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EncodeError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Summary of a [`mux_streams`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MuxSummary {
    pub streams: usize,
    pub lines: usize,
    /// Empty lines left out.
    pub skipped_empty: usize,
    pub bytes: u64,
}

/// Encode per-stream lines into one container.
///
/// Streams are separated by stream-begin markers and lines within a stream
/// by frame-begin markers. Empty lines are skipped since a zero-length
/// literal run decodes to nothing. Decoding the result reproduces each line
/// as long as no literal run crosses a read-buffer boundary or exceeds the
/// line cap.
///
/// On error the failing stream and line index are logged.
pub fn mux_streams<W, L>(streams: &[Vec<L>], out: W) -> Result<MuxSummary, EncodeError>
where
    W: Write,
    L: AsRef<[u8]>,
{
    let mut writer = XtxtWriter::new(out);
    let mut summary = MuxSummary {
        streams: streams.len(),
        ..MuxSummary::default()
    };

    for (index, lines) in streams.iter().enumerate() {
        if index > 0 {
            writer.begin_stream()?;
        }

        let mut first = true;
        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.is_empty() {
                summary.skipped_empty += 1;
                continue;
            }
            if !first {
                writer.begin_frame()?;
            }
            writer.write_literal(line).inspect_err(|err| {
                debug!(stream = index, row, error = %err, "literal rejected");
            })?;
            summary.lines += 1;
            first = false;
        }
    }

    writer.flush()?;
    summary.bytes = writer.bytes_written();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demux::{demux_bytes, DemuxConfig};

    #[test]
    fn writes_literals_and_markers() {
        let mut writer = XtxtWriter::new(Vec::<u8>::new());
        writer.write_literal(b"abc").unwrap();
        writer.begin_stream().unwrap();
        writer.write_literal(b"de").unwrap();
        writer.begin_frame().unwrap();
        writer.write_literal(b"fg").unwrap();
        writer.begin_chunk().unwrap();

        assert_eq!(writer.bytes_written(), 13);
        assert_eq!(writer.into_inner(), b"abc\xFF\xFEde\xFF\xFDfg\xFF\xFC");
    }

    #[test]
    fn rejects_escape_in_literal() {
        let mut writer = XtxtWriter::new(Vec::<u8>::new());
        let err = writer.write_literal(b"ok\xFFno").unwrap_err();
        assert!(matches!(err, EncodeError::EscapeInLiteral { offset: 2 }));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn mux_layout() {
        let streams = vec![vec!["a", "b"], vec!["c"]];
        let mut out: Vec<u8> = Vec::new();
        let summary = mux_streams(&streams, &mut out).unwrap();

        assert_eq!(out, b"a\xFF\xFDb\xFF\xFEc");
        assert_eq!(
            summary,
            MuxSummary {
                streams: 2,
                lines: 3,
                skipped_empty: 0,
                bytes: 7
            }
        );
    }

    #[test]
    fn mux_skips_empty_lines() {
        let streams = vec![vec!["", "x", "", "y"]];
        let mut out: Vec<u8> = Vec::new();
        let summary = mux_streams(&streams, &mut out).unwrap();
        assert_eq!(out, b"x\xFF\xFDy");
        assert_eq!(summary.skipped_empty, 2);
    }

    #[test]
    fn mux_then_demux_restores_lines() {
        let streams = vec![
            vec!["alpha", "beta", "gamma"],
            vec!["one"],
            vec!["x", "y"],
        ];
        let mut out: Vec<u8> = Vec::new();
        mux_streams(&streams, &mut out).unwrap();

        let decoded = demux_bytes(&out, DemuxConfig::default()).unwrap();
        assert_eq!(decoded.streams.stream_count(), 3);
        for (index, expected) in streams.iter().enumerate() {
            let got: Vec<String> = decoded
                .streams
                .stream(index)
                .unwrap()
                .lines()
                .iter()
                .map(|l| l.to_string_lossy().into_owned())
                .collect();
            assert_eq!(&got, expected);
        }
        assert_eq!(decoded.frames, 3);
    }

    #[test]
    fn mux_propagates_escape_error() {
        let streams = vec![vec![b"fine".to_vec(), b"bad\xFF".to_vec()]];
        let err = mux_streams(&streams, Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, EncodeError::EscapeInLiteral { offset: 3 }));
    }

    #[test]
    fn write_zero_is_an_error() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = XtxtWriter::new(Full);
        let err = writer.write_literal(b"x").unwrap_err();
        assert!(matches!(err, EncodeError::Io(e) if e.kind() == ErrorKind::WriteZero));
    }
}

//! Column-aligned rendering of a finished stream table.

use std::io::{self, Write};

use crate::store::StreamStore;

/// Default column width in bytes.
pub const DEFAULT_COLUMN_WIDTH: usize = 20;

/// Selection and layout options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix each row with its 1-based number, zero-padded to 4 digits.
    pub show_line_numbers: bool,
    /// Print only this 1-based row. `Some(0)` behaves like `None`.
    pub line: Option<usize>,
    /// Print only this stream's column.
    pub stream: Option<usize>,
    /// Column width in bytes. Longer lines are printed whole.
    pub column_width: usize,
    /// Accepted for command-line compatibility; has no effect on output.
    pub header: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            line: None,
            stream: None,
            column_width: DEFAULT_COLUMN_WIDTH,
            header: false,
        }
    }
}

/// Write one row per line index across the selected streams.
pub fn render<W: Write>(store: &StreamStore, opts: &RenderOptions, out: &mut W) -> io::Result<()> {
    let longest = store.longest_stream();
    let rows = match opts.line.filter(|&line| line > 0) {
        Some(line) if line <= longest => line - 1..line,
        Some(_) => 0..0,
        None => 0..longest,
    };

    for row in rows {
        if opts.show_line_numbers {
            write!(out, "{:04} ", row + 1)?;
        }

        for (index, stream) in store.streams().iter().enumerate() {
            if opts.stream.is_some_and(|selected| selected != index) {
                continue;
            }

            let cell = stream.line(row).map(|l| l.as_bytes()).unwrap_or_default();
            out.write_all(cell)?;
            let pad = opts.column_width.saturating_sub(cell.len());
            write!(out, "{:pad$}", "")?;
        }

        out.write_all(b"\n")?;
    }

    Ok(())
}

/// Render into a string, replacing invalid UTF-8.
pub fn render_to_string(store: &StreamStore, opts: &RenderOptions) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = render(store, opts, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

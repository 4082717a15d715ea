use std::io::{self, BufWriter, Write};

use tracing::debug;
use xtxt_demux::{demux_file, render, RenderOptions};

use crate::cmd::CatArgs;
use crate::exit::{demux_error, io_error, CliResult, SUCCESS};

pub fn run(args: CatArgs) -> CliResult<i32> {
    let config = args.decode.config();
    let demuxed = demux_file(&args.path, config).map_err(|err| demux_error("cat", err))?;
    debug!(
        streams = demuxed.streams.stream_count(),
        rows = demuxed.streams.longest_stream(),
        frames = demuxed.frames,
        "decoded input"
    );

    let options = RenderOptions {
        show_line_numbers: args.show_line_numbers(),
        line: args.line,
        stream: args.stream,
        column_width: args.width,
        header: args.head,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    render(&demuxed.streams, &options, &mut out)
        .and_then(|()| out.flush())
        .or_else(ignore_broken_pipe)
        .map_err(|err| io_error("cat: write failed", err))?;

    Ok(SUCCESS)
}

/// A closed pipe (`xtxt cat f | head`) is a normal way for output to end.
fn ignore_broken_pipe(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::BrokenPipe {
        Ok(())
    } else {
        Err(err)
    }
}

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use xtxt_demux::{demux_file, Stream};

use crate::cmd::DemuxArgs;
use crate::exit::{demux_error, io_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct WrittenStream {
    index: usize,
    path: String,
    lines: usize,
}

#[derive(Serialize)]
struct DemuxOutput {
    out_dir: String,
    streams: Vec<WrittenStream>,
}

pub fn run(args: DemuxArgs, format: OutputFormat) -> CliResult<i32> {
    let demuxed =
        demux_file(&args.path, args.decode.config()).map_err(|err| demux_error("demux", err))?;

    let stem = file_stem(&args.path);
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(format!("{stem}.demuxed")));
    fs::create_dir_all(&out_dir).map_err(|err| {
        io_error(&format!("demux: cannot create {}", out_dir.display()), err)
    })?;

    let count = demuxed.streams.stream_count();
    let mut written = Vec::with_capacity(count);
    for (index, stream) in demuxed.streams.streams().iter().enumerate() {
        let path = out_dir.join(stream_file_name(&stem, index, count));
        write_stream(&path, stream)
            .map_err(|err| io_error(&format!("demux: cannot write {}", path.display()), err))?;
        written.push(WrittenStream {
            index,
            path: path.display().to_string(),
            lines: stream.line_count(),
        });
    }
    info!(streams = count, dir = %out_dir.display(), "streams demuxed");

    let out = DemuxOutput {
        out_dir: out_dir.display().to_string(),
        streams: written,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(&["STREAM", "LINES", "FILE"]);
            for stream in &out.streams {
                table.add_row(vec![
                    stream.index.to_string(),
                    stream.lines.to_string(),
                    stream.path.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} streams demuxed into {}", out.streams.len(), out.out_dir);
        }
    }
    Ok(SUCCESS)
}

/// Input file name without its last extension.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stream".to_string())
}

/// `<stem>.sNN.txt`, with the index padded to at least two digits and
/// enough digits for the highest index.
fn stream_file_name(stem: &str, index: usize, count: usize) -> String {
    let digits = count.saturating_sub(1).to_string().len().max(2);
    format!("{stem}.s{index:0digits$}.txt")
}

fn write_stream(path: &Path, stream: &Stream) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for line in stream.lines() {
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_names_pad_to_two_digits() {
        assert_eq!(stream_file_name("talk", 0, 3), "talk.s00.txt");
        assert_eq!(stream_file_name("talk", 7, 10), "talk.s07.txt");
    }

    #[test]
    fn stream_names_widen_for_many_streams() {
        assert_eq!(stream_file_name("talk", 5, 101), "talk.s005.txt");
        assert_eq!(stream_file_name("talk", 100, 101), "talk.s100.txt");
    }

    #[test]
    fn stem_drops_last_extension() {
        assert_eq!(file_stem(Path::new("dir/talk.v2.xtxt")), "talk.v2");
        assert_eq!(file_stem(Path::new("plain")), "plain");
    }
}

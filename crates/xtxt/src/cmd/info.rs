use serde::Serialize;
use xtxt_demux::{demux_file, DemuxStats, Demuxed};

use crate::cmd::InfoArgs;
use crate::exit::{demux_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, text_preview, OutputFormat};

const PREVIEW_CHARS: usize = 24;

#[derive(Serialize)]
struct StreamInfo {
    index: usize,
    lines: usize,
    max_width: usize,
    bytes: usize,
    first_line: Option<String>,
}

#[derive(Serialize)]
struct InfoOutput {
    path: String,
    stream_count: usize,
    longest_stream: usize,
    frames: u64,
    streams: Vec<StreamInfo>,
    stats: DemuxStats,
}

impl InfoOutput {
    fn new(path: String, demuxed: &Demuxed) -> Self {
        let streams = demuxed
            .streams
            .streams()
            .iter()
            .enumerate()
            .map(|(index, stream)| StreamInfo {
                index,
                lines: stream.line_count(),
                max_width: stream.max_width(),
                bytes: stream.byte_len(),
                first_line: stream
                    .line(0)
                    .map(|line| text_preview(line.as_bytes(), PREVIEW_CHARS)),
            })
            .collect();

        Self {
            path,
            stream_count: demuxed.streams.stream_count(),
            longest_stream: demuxed.streams.longest_stream(),
            frames: demuxed.frames,
            streams,
            stats: demuxed.stats,
        }
    }
}

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let demuxed =
        demux_file(&args.path, args.decode.config()).map_err(|err| demux_error("info", err))?;
    let out = InfoOutput::new(args.path.display().to_string(), &demuxed);
    print_info(&out, format);
    Ok(SUCCESS)
}

fn print_info(out: &InfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table(&["STREAM", "LINES", "MAX WIDTH", "BYTES", "FIRST LINE"]);
            for stream in &out.streams {
                table.add_row(vec![
                    stream.index.to_string(),
                    stream.lines.to_string(),
                    stream.max_width.to_string(),
                    stream.bytes.to_string(),
                    stream.first_line.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
            print_summary(out);
        }
        OutputFormat::Pretty => {
            println!("File: {}", out.path);
            for stream in &out.streams {
                println!(
                    "  stream {:>3}: {} lines, max width {}, {} bytes",
                    stream.index, stream.lines, stream.max_width, stream.bytes
                );
            }
            print_summary(out);
        }
    }
}

fn print_summary(out: &InfoOutput) {
    let stats = &out.stats;
    println!("Streams:  {}", out.stream_count);
    println!("Rows:     {}", out.longest_stream);
    println!("Frames:   {}", out.frames);
    println!(
        "Markers:  {} (stream {}, frame {}, chunk {})",
        stats.markers(),
        stats.stream_markers,
        stats.frame_markers,
        stats.chunk_markers
    );
    println!("Bytes:    {} ({} literal)", stats.bytes, stats.literal_bytes);
    if stats.dropped_bytes > 0 {
        println!("Dropped:  {} trailing escape byte", stats.dropped_bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtxt_demux::{demux_bytes, DemuxConfig};

    #[test]
    fn builds_per_stream_rows() {
        let demuxed = demux_bytes(b"abc\xFF\xFEde\xFF\xFDfg", DemuxConfig::default()).unwrap();
        let out = InfoOutput::new("sample.xtxt".to_string(), &demuxed);

        assert_eq!(out.stream_count, 2);
        assert_eq!(out.longest_stream, 2);
        assert_eq!(out.frames, 1);
        assert_eq!(out.streams[0].lines, 1);
        assert_eq!(out.streams[0].first_line.as_deref(), Some("abc"));
        assert_eq!(out.streams[1].lines, 2);
        assert_eq!(out.streams[1].max_width, 2);
        assert_eq!(out.streams[1].bytes, 4);
    }

    #[test]
    fn empty_stream_has_no_preview() {
        let demuxed = demux_bytes(b"\xFF\xFEx", DemuxConfig::default()).unwrap();
        let out = InfoOutput::new("x".to_string(), &demuxed);
        assert_eq!(out.streams[0].lines, 0);
        assert!(out.streams[0].first_line.is_none());
    }

    #[test]
    fn serializes_stats() {
        let demuxed = demux_bytes(b"ab\xFF\xFDcd", DemuxConfig::default()).unwrap();
        let out = InfoOutput::new("f".to_string(), &demuxed);
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["stats"]["frame_markers"], 1);
        assert_eq!(value["stats"]["bytes"], 6);
        assert_eq!(value["streams"][0]["lines"], 2);
    }
}

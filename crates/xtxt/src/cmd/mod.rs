use clap::{Args, Subcommand};
use std::path::PathBuf;

use xtxt_demux::{DemuxConfig, DEFAULT_COLUMN_WIDTH, DEFAULT_MAX_STREAMS};
use xtxt_source::DEFAULT_BUFFER_SIZE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod cat;
pub mod demux;
pub mod frames;
pub mod info;
pub mod mux;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the streams of a file side by side, one column per stream.
    Cat(CatArgs),
    /// Count frame markers (FF FD pairs) without decoding.
    Frames(FramesArgs),
    /// Decode a file and report streams, frames and marker counts.
    Info(InfoArgs),
    /// Write each stream of a file to its own text file.
    Demux(DemuxArgs),
    /// Build an xtxt file from text files, one stream per file.
    Mux(MuxArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Cat(args) => cat::run(args),
        Command::Frames(args) => frames::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Demux(args) => demux::run(args, format),
        Command::Mux(args) => mux::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Decoder settings shared by every command that decodes a file.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Read buffer size in bytes; lines are also capped one byte short of it.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_BUFFER_SIZE,
        value_parser = parse_buffer_size,
        env = "XTXT_BUFFER_SIZE"
    )]
    pub buffer_size: usize,
    /// Maximum number of streams.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_STREAMS,
        value_parser = parse_positive,
        env = "XTXT_MAX_STREAMS"
    )]
    pub max_streams: usize,
    /// Fail when the input ends with a dangling escape byte.
    #[arg(long)]
    pub strict: bool,
}

impl DecodeArgs {
    pub fn config(&self) -> DemuxConfig {
        DemuxConfig {
            max_streams: self.max_streams,
            strict: self.strict,
            ..DemuxConfig::with_buffer_size(self.buffer_size)
        }
    }
}

#[derive(Args, Debug)]
pub struct CatArgs {
    /// Input xtxt file.
    pub path: PathBuf,
    /// Display line numbers (default).
    #[arg(short = 'n', long, overrides_with = "no_line_numbers")]
    pub line_numbers: bool,
    /// Hide line numbers.
    #[arg(short = 'N', long, overrides_with = "line_numbers")]
    pub no_line_numbers: bool,
    /// Display only the stream with this index.
    #[arg(short = 's', long, value_name = "INDEX")]
    pub stream: Option<usize>,
    /// Column width in bytes.
    #[arg(
        short = 'w',
        long,
        value_name = "WIDTH",
        default_value_t = DEFAULT_COLUMN_WIDTH,
        value_parser = parse_positive,
        env = "XTXT_COLUMN_WIDTH"
    )]
    pub width: usize,
    /// Treat the first line as a header (accepted, no effect yet).
    #[arg(short = 'H', long)]
    pub head: bool,
    /// Display only this 1-based line; 0 displays all.
    #[arg(short = 'l', long, value_name = "LINE")]
    pub line: Option<usize>,
    #[command(flatten)]
    pub decode: DecodeArgs,
}

impl CatArgs {
    pub fn show_line_numbers(&self) -> bool {
        !self.no_line_numbers
    }
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Input xtxt file.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input xtxt file.
    pub path: PathBuf,
    #[command(flatten)]
    pub decode: DecodeArgs,
}

#[derive(Args, Debug)]
pub struct DemuxArgs {
    /// Input xtxt file.
    pub path: PathBuf,
    /// Output directory. Default: `<stem>.demuxed` in the current directory.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    #[command(flatten)]
    pub decode: DecodeArgs,
}

#[derive(Args, Debug)]
pub struct MuxArgs {
    /// Output file; `.xtxt` is appended when it has no extension.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,
    /// Input text files, one stream each, in order.
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_positive(input: &str) -> Result<usize, String> {
    let value: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {input}"))?;
    if value == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(value)
}

fn parse_buffer_size(input: &str) -> Result<usize, String> {
    let value = parse_positive(input)?;
    if value < 2 {
        return Err("buffer size must be at least 2 bytes".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positive_accepts_numbers() {
        assert_eq!(parse_positive("20"), Ok(20));
        assert_eq!(parse_positive(" 7 "), Ok(7));
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-3").is_err());
        assert!(parse_positive("wide").is_err());
    }

    #[test]
    fn buffer_size_needs_two_bytes() {
        assert!(parse_buffer_size("1").is_err());
        assert_eq!(parse_buffer_size("2"), Ok(2));
    }

    #[test]
    fn decode_args_build_config() {
        let args = DecodeArgs {
            buffer_size: 64,
            max_streams: 4,
            strict: true,
        };
        let config = args.config();
        assert_eq!(config.buffer_size, 64);
        assert_eq!(config.max_line_len, 63);
        assert_eq!(config.max_streams, 4);
        assert!(config.strict);
    }
}

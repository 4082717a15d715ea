use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use xtxt_demux::{mux_streams, ESCAPE};

use crate::cmd::MuxArgs;
use crate::exit::{encode_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct MuxOutput {
    output: String,
    inputs: Vec<String>,
    streams: usize,
    lines: usize,
    skipped_empty: usize,
    bytes: u64,
}

pub fn run(args: MuxArgs, format: OutputFormat) -> CliResult<i32> {
    let output = output_path(&args.output);
    if overwrites_input(&output, &args.inputs) {
        return Err(CliError::new(
            USAGE,
            format!("mux: output {} is also an input", output.display()),
        ));
    }

    let mut contents = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let data = fs::read(input)
            .map_err(|err| io_error(&format!("mux: cannot read {}", input.display()), err))?;
        if let Some(offset) = data.iter().position(|&b| b == ESCAPE) {
            return Err(CliError::new(
                DATA_INVALID,
                format!(
                    "mux: {} contains escape byte 0xFF at offset {offset}",
                    input.display()
                ),
            ));
        }
        contents.push(data);
    }
    let streams: Vec<Vec<&[u8]>> = contents.iter().map(|data| split_lines(data)).collect();

    let file = File::create(&output)
        .map_err(|err| io_error(&format!("mux: cannot create {}", output.display()), err))?;
    let summary =
        mux_streams(&streams, BufWriter::new(file)).map_err(|err| encode_error("mux", err))?;
    info!(
        streams = summary.streams,
        lines = summary.lines,
        bytes = summary.bytes,
        "container written"
    );

    let out = MuxOutput {
        output: output.display().to_string(),
        inputs: args
            .inputs
            .iter()
            .map(|input| input.display().to_string())
            .collect(),
        streams: summary.streams,
        lines: summary.lines,
        skipped_empty: summary.skipped_empty,
        bytes: summary.bytes,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Muxing: ({}) into: {}", out.inputs.join(", "), out.output);
            if out.skipped_empty > 0 {
                println!("  skipped {} empty lines", out.skipped_empty);
            }
            println!("{} muxed OK ({} bytes)", out.output, out.bytes);
        }
    }
    Ok(SUCCESS)
}

/// Append `.xtxt` when the name has no extension.
fn output_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".xtxt");
        PathBuf::from(name)
    }
}

/// True when `output` names the same file as one of `inputs`.
///
/// Paths that exist are compared canonicalized, so `./a.txt` matches `a.txt`.
fn overwrites_input(output: &Path, inputs: &[PathBuf]) -> bool {
    let Ok(output) = fs::canonicalize(output) else {
        return inputs.iter().any(|input| input == output);
    };
    inputs
        .iter()
        .filter_map(|input| fs::canonicalize(input).ok())
        .any(|input| input == output)
}

/// Split on `\n`, dropping a trailing `\r` from each line.
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    data.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

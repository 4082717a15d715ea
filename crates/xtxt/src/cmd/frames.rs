use serde::Serialize;
use xtxt_demux::count_frames;
use xtxt_source::ReaderSource;

use crate::cmd::FramesArgs;
use crate::exit::{demux_error, source_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Serialize)]
struct FramesOutput {
    path: String,
    frames: u64,
}

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let source = ReaderSource::open(&args.path).map_err(|err| source_error("frames", err))?;
    let frames = count_frames(source).map_err(|err| demux_error("frames", err))?;

    let out = FramesOutput {
        path: args.path.display().to_string(),
        frames,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(&["FILE", "FRAMES"]);
            table.add_row(vec![out.path.clone(), out.frames.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("Total frames: {}", out.frames),
    }
    Ok(SUCCESS)
}

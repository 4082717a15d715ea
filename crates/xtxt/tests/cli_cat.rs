#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SAMPLE: &[u8] = b"abc\xFF\xFEde\xFF\xFDfg";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/xtxtcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_input(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("input should be writable");
    path
}

fn xtxt(args: &[&str], path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xtxt"))
        .env_remove("XTXT_COLUMN_WIDTH")
        .env_remove("XTXT_BUFFER_SIZE")
        .env_remove("XTXT_MAX_STREAMS")
        .args(["--log-level", "off", "cat"])
        .args(args)
        .arg(path)
        .output()
        .expect("cat should run")
}

#[test]
fn renders_sample_with_defaults() {
    let dir = unique_temp_dir("cat-default");
    let input = write_input(&dir, "sample.xtxt", SAMPLE);

    let output = xtxt(&[], &input);
    assert!(output.status.success());
    let expected = format!(
        "0001 {:<20}{:<20}\n0002 {:<20}{:<20}\n",
        "abc", "de", "", "fg"
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn width_line_and_stream_filters() {
    let dir = unique_temp_dir("cat-filters");
    let input = write_input(&dir, "sample.xtxt", SAMPLE);

    let output = xtxt(&["-w", "5", "-l", "2"], &input);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"0002      fg   \n");

    let output = xtxt(&["-w", "5", "-s", "1"], &input);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"0001 de   \n0002 fg   \n");

    let output = xtxt(&["-N", "-w", "4"], &input);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"abc de  \n    fg  \n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn header_flag_does_not_change_output() {
    let dir = unique_temp_dir("cat-header");
    let input = write_input(&dir, "sample.xtxt", SAMPLE);

    let plain = xtxt(&["-w", "6"], &input);
    let header = xtxt(&["-w", "6", "-H"], &input);
    assert!(plain.status.success());
    assert_eq!(plain.stdout, header.stdout);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_fails_with_message() {
    let dir = unique_temp_dir("cat-missing");
    let output = xtxt(&[], &dir.join("nope.xtxt"));

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open"));
    assert!(output.stdout.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_marker_exits_60() {
    let dir = unique_temp_dir("cat-malformed");
    let input = write_input(&dir, "bad.xtxt", b"ab\xFF\x41cd");

    let output = xtxt(&[], &input);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid marker 0x41 at offset 2"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn too_many_streams_exits_60() {
    let dir = unique_temp_dir("cat-capacity");
    let input = write_input(&dir, "wide.xtxt", b"a\xFF\xFEb\xFF\xFEc");

    let output = xtxt(&["--max-streams", "2"], &input);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("too many streams"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dangling_escape_is_dropped_unless_strict() {
    let dir = unique_temp_dir("cat-dangling");
    let input = write_input(&dir, "tail.xtxt", b"ab\xFF");

    let output = xtxt(&["-N", "-w", "2"], &input);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"ab\n");

    let output = xtxt(&["--strict"], &input);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn small_buffer_splits_lines_at_boundary() {
    let dir = unique_temp_dir("cat-buffer");
    let input = write_input(&dir, "split.xtxt", b"abcdef");

    let output = xtxt(&["-N", "-w", "1", "--buffer-size", "4"], &input);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"abc\nd\nef\n");

    let _ = std::fs::remove_dir_all(&dir);
}

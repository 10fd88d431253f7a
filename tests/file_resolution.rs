use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyfile::file_handler::{
    any_path_ok, count_lines, remove_compression_variants, try_count_lines, AccessMethod,
    DecodeKind, PipeKind, NULL_DEVICE,
};
use anyfile::{open_any, resolve_readable, resolve_writable, try_open_any, AnyWriter};
use flate2::{write::GzEncoder, Compression};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn write_gzip(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).expect("create gzip fixture");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(contents).unwrap();
    encoder.finish().unwrap();
    path
}

fn read_to_string(name: &Path) -> String {
    let mut reader = open_any(name);
    let mut text = String::new();
    reader.read_to_string(&mut text).expect("read resolved content");
    reader.finish().expect("reader finishes cleanly");
    text
}

/// Some tests need external tools; they are skipped where the tools are missing.
fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("-h")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}

#[test]
fn exact_name_is_preferred_over_compressed_siblings() {
    let dir = TempDir::new().unwrap();
    let plain = write_file(&dir, "foo", b"plain\n");
    write_gzip(&dir, "foo.gz", b"gzip\n");
    write_file(&dir, "foo.bz2", b"not really bzip2");

    let resolution = resolve_readable(&plain);
    assert_eq!(resolution.path, plain);
    assert_eq!(resolution.method, AccessMethod::DirectRead);
    assert_eq!(read_to_string(&plain), "plain\n");
}

#[test]
fn missing_name_falls_back_to_gzip_sibling() {
    let dir = TempDir::new().unwrap();
    let gz = write_gzip(&dir, "foo.gz", b"from gzip\n");
    let name = dir.path().join("foo");

    let resolution = resolve_readable(&name);
    assert_eq!(resolution.path, gz);
    assert_eq!(
        resolution.method,
        AccessMethod::InProcessDecode(DecodeKind::Gzip)
    );
    assert_eq!(read_to_string(&name), "from gzip\n");
}

#[test]
fn nonexistent_name_is_not_found_without_panicking() {
    let dir = TempDir::new().unwrap();
    let name = dir.path().join("nonexistent");

    let resolution = resolve_readable(&name);
    assert_eq!(resolution.method, AccessMethod::NotFound);
    assert_eq!(resolution.path, PathBuf::from(NULL_DEVICE));
    assert!(!any_path_ok(&name));
    assert!(try_open_any(&name).unwrap_err().is_not_found());
}

#[test]
fn read_resolution_leaves_filesystem_untouched() {
    let dir = TempDir::new().unwrap();
    write_gzip(&dir, "keep.gz", b"x\n");
    write_file(&dir, "keep.zip", b"zip bytes");

    resolve_readable(dir.path().join("keep"));
    resolve_readable(dir.path().join("keep.xz"));

    assert!(dir.path().join("keep.gz").exists());
    assert!(dir.path().join("keep.zip").exists());
}

#[test]
fn writable_resolution_deletes_stale_gzip() {
    let dir = TempDir::new().unwrap();
    let gz = write_gzip(&dir, "foo.gz", b"stale\n");

    let resolution = resolve_writable(dir.path().join("foo"));
    assert_eq!(resolution.path, gz);
    assert!(!gz.exists());
}

#[test]
fn writable_resolution_honours_fixed_priority_with_several_variants() {
    let dir = TempDir::new().unwrap();
    let xz = write_file(&dir, "foo.xz", b"1");
    let gz = write_file(&dir, "foo.gz", b"2");
    let bz2 = write_file(&dir, "foo.bz2", b"3");
    let name = dir.path().join("foo");

    assert_eq!(resolve_writable(&name).path, xz);
    assert_eq!(resolve_writable(&name).path, gz);
    assert_eq!(resolve_writable(&name).path, bz2);
    assert!(!resolve_writable(&name).is_found());
}

#[test]
fn written_plain_file_is_not_shadowed_by_old_archive() {
    let dir = TempDir::new().unwrap();
    write_gzip(&dir, "daily.csv.gz", b"old,1\n");
    let target = dir.path().join("daily.csv");

    let mut writer = AnyWriter::create(&target).unwrap();
    writer.write_all(b"new,2\nnew,3\n").unwrap();
    writer.finish().unwrap();

    let resolution = resolve_readable(&target);
    assert_eq!(resolution.path, target);
    assert_eq!(count_lines(&target), 2);
    assert!(!dir.path().join("daily.csv.gz").exists());
}

#[test]
fn line_count_streams_large_compressed_content() {
    let dir = TempDir::new().unwrap();
    let mut content = Vec::new();
    for i in 0..50_000 {
        writeln!(content, "2024-09-02T10:00:00 INFO request {i}").unwrap();
    }
    content.extend_from_slice(b"trailing record without newline");
    write_gzip(&dir, "big.log.gz", &content);

    assert_eq!(try_count_lines(dir.path().join("big.log")).unwrap(), 50_001);
}

#[test]
fn remove_compression_variants_clears_every_sibling() {
    let dir = TempDir::new().unwrap();
    for name in ["t.csv", "t.csv.xz", "t.csv.gz", "t.csv.bz2", "t.csv.zip"] {
        write_file(&dir, name, b"x");
    }

    remove_compression_variants(dir.path().join("t.csv.bz2"), false);
    for name in ["t.csv", "t.csv.xz", "t.csv.gz", "t.csv.bz2", "t.csv.zip"] {
        assert!(!dir.path().join(name).exists(), "{name} should be gone");
    }
}

#[test]
fn xz_sibling_is_read_through_xzcat() {
    if !tool_available("xz") || !tool_available("xzcat") {
        eprintln!("skipping: xz tools not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    let plain = write_file(&dir, "notes.txt", b"one\ntwo\nthree\n");
    let status = Command::new("xz").arg(&plain).status().unwrap();
    assert!(status.success());
    assert!(!plain.exists());

    let resolution = resolve_readable(&plain);
    assert_eq!(resolution.method, AccessMethod::ExternalPipe(PipeKind::Xz));
    assert_eq!(read_to_string(&plain), "one\ntwo\nthree\n");
    assert_eq!(count_lines(&plain), 3);
}

#[test]
fn zip_sibling_reads_first_entry_only() {
    if !tool_available("zip") || !tool_available("unzip") {
        eprintln!("skipping: zip tools not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a.txt", b"first entry\n");
    write_file(&dir, "b.txt", b"second entry\n");
    let status = Command::new("zip")
        .current_dir(dir.path())
        .args(["-q", "bundle.zip", "a.txt", "b.txt"])
        .status()
        .unwrap();
    assert!(status.success());

    let name = dir.path().join("bundle");
    let resolution = resolve_readable(&name);
    assert_eq!(resolution.method, AccessMethod::ExternalPipe(PipeKind::Zip));
    assert_eq!(read_to_string(&name), "first entry\n");
}

#[cfg(unix)]
#[test]
fn zip_entry_with_wildcard_characters_is_read_literally() {
    if !tool_available("zip") || !tool_available("unzip") {
        eprintln!("skipping: zip tools not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    write_file(&dir, "a[1]*?.txt", b"bracketed\n");
    let status = Command::new("zip")
        .current_dir(dir.path())
        .args(["-q", "b.zip", "a[1]*?.txt"])
        .status()
        .unwrap();
    assert!(status.success());

    let name = dir.path().join("b");
    assert_eq!(try_count_lines(&name).unwrap(), 1);
    assert_eq!(read_to_string(&name), "bracketed\n");
}

#[cfg(unix)]
#[test]
fn executable_script_output_is_the_content() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "feed.bash", b"#!/bin/sh\nfor i in 1 2 3 4; do echo row$i; done\n");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(resolve_readable(&script).method, AccessMethod::ScriptExec);
    assert_eq!(count_lines(&script), 4);
}

#[cfg(unix)]
#[test]
fn dropping_reader_early_reaps_child() {
    use std::io::BufRead;
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let script = write_file(&dir, "endless.bash", b"#!/bin/sh\nwhile true; do echo tick; done\n");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut reader = open_any(&script);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "tick\n");
    // Must return rather than block on the still-running script.
    drop(reader);
}

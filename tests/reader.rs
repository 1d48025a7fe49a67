use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use dotparse::{Error, ParseErrorKind, ParseOptions, parse_reader, parse_reader_with_options};

#[test]
fn parses_file_through_reader() {
    let dir = make_temp_dir("reader-file");
    let path = dir.join(".env");
    write_file(&path, "export HOST=localhost\nPORT: 8080\nURL=\"http://$HOST:${PORT}\"\n");

    let file = File::open(&path).expect("failed to open fixture file");
    let parsed = parse_reader(file).expect("parse should succeed");

    assert_eq!(parsed.keys().collect::<Vec<_>>(), ["HOST", "PORT", "URL"]);
    assert_eq!(parsed.get("URL"), Some("http://localhost:8080"));
}

#[test]
fn reader_reports_parse_errors_with_position() {
    let dir = make_temp_dir("reader-malformed");
    let path = dir.join(".env");
    write_file(&path, "A=ok\nB=\"never closed\n");

    let file = File::open(&path).expect("failed to open fixture file");
    let err = parse_reader(file).expect_err("expected parse error");

    match err {
        Error::Parse(parse_err) => {
            assert_eq!(parse_err.line, 2);
            assert!(matches!(
                parse_err.kind,
                ParseErrorKind::UnterminatedQuote { .. }
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn reader_propagates_io_failure() {
    let dir = make_temp_dir("reader-io");

    // Opening a directory may succeed, but reading it does not.
    let file = File::open(&dir);
    let Ok(file) = file else {
        return;
    };
    let err = parse_reader(file).expect_err("expected I/O error");

    match err {
        Error::Io(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn strict_options_apply_to_reader() {
    let dir = make_temp_dir("reader-strict");
    let path = dir.join(".env");
    write_file(&path, "=orphan\n");

    let lenient = parse_reader(File::open(&path).expect("failed to open fixture file"))
        .expect("parse should succeed");
    assert_eq!(lenient.get(""), Some("orphan"));

    let err = parse_reader_with_options(
        File::open(&path).expect("failed to open fixture file"),
        ParseOptions::strict(),
    )
    .expect_err("expected parse error");
    match err {
        Error::Parse(parse_err) => assert_eq!(parse_err.kind, ParseErrorKind::MissingKey),
        other => panic!("unexpected error: {other:?}"),
    }
}

fn make_temp_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    path.push(format!("dotparse-{name}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&path).expect("failed to create temp dir");
    path
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("failed to write test file");
}

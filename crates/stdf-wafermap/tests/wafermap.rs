use std::io::Cursor;
use std::path::PathBuf;

use assert_matches::assert_matches;
use stdf_parser::{ParseError, StreamProcessor};
use stdf_wafermap::cli::{self, EXIT_FAILURE, EXIT_USAGE, USAGE};
use stdf_wafermap::{collect_parts, dump_file, dump_stream, Bounds, Coord, DumpConfig, Grid};
use tempdir::TempDir;

fn build_record(major: u8, minor: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.push(major);
    out.push(minor);
    out.extend_from_slice(body);
    out
}

fn pstr(out: &mut Vec<u8>, s: &str) {
    out.push(s.len() as u8);
    out.extend_from_slice(s.as_bytes());
}

fn prr(id: &str, x: i16, y: i16) -> Vec<u8> {
    let mut b = vec![1, 1, 0];
    b.extend_from_slice(&12u16.to_le_bytes()); // num_test
    b.extend_from_slice(&1u16.to_le_bytes()); // hard_bin
    b.extend_from_slice(&1u16.to_le_bytes()); // soft_bin
    b.extend_from_slice(&x.to_le_bytes());
    b.extend_from_slice(&y.to_le_bytes());
    b.extend_from_slice(&250u32.to_le_bytes()); // test_t
    pstr(&mut b, id);
    build_record(5, 20, &b)
}

/// A small lot: file attributes, a site description, an unregistered
/// record, an unparsed PIR, four part results (one overwriting an earlier
/// id), a truncated PRR body, the end marker and trailing garbage.
fn sample_stream() -> Vec<u8> {
    let mut data = build_record(0, 10, &[2, 4]);

    let mut sdr = vec![1, 0, 2, 1, 2];
    pstr(&mut sdr, "HANDLER-9");
    pstr(&mut sdr, "H9");
    data.extend(build_record(1, 80, &sdr));

    data.extend(build_record(99, 1, &[1, 2, 3]));
    data.extend(build_record(5, 10, &[1, 1]));
    data.extend(prr("P1", 0, 0));
    data.extend(prr("P2", 1, 0));
    data.extend(prr("P3", 1, 1));
    data.extend(prr("P1", -1, 1));
    data.extend(build_record(5, 20, &[1, 1]));
    data.extend([0, 0, 0, 0]);
    data.extend([0xFF, 0xFF]);
    data
}

#[test]
fn collects_parts_from_stream() {
    let (parts, summary) = collect_parts(Cursor::new(sample_stream())).unwrap();
    assert_eq!(summary.decoded, 6);
    assert_eq!(summary.unparsed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.malformed, 1);
    assert!(!summary.truncated);

    assert_eq!(parts.len(), 3);
    assert_eq!(parts.get("P1"), Some(Coord { x: -1, y: 1 }));
    assert_eq!(
        parts.bounds(),
        Bounds {
            min_x: -1,
            max_x: 1,
            min_y: 0,
            max_y: 1
        }
    );
}

#[test]
fn single_prr_yields_one_part() {
    let mut body = vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 0x05, 0x00, 0x03, 0x00, 0, 0, 0, 0, 3];
    body.extend_from_slice(b"ABC");
    let mut data = build_record(5, 20, &body);
    data.extend([0, 0, 0, 0]);

    let (parts, _) = collect_parts(Cursor::new(data)).unwrap();
    let all: Vec<_> = parts.parts().collect();
    assert_eq!(all.len(), 1);
    assert_eq!((all[0].id, all[0].x, all[0].y), ("ABC", 5, 3));
    assert_eq!(parts.bounds().min_x, 5);
    assert_eq!(parts.bounds().min_y, 3);
}

#[test]
fn sentinel_only_stream_is_empty() {
    let (parts, summary) = collect_parts(Cursor::new(vec![0, 0, 0, 0])).unwrap();
    assert!(parts.is_empty());
    assert_eq!(summary.decoded + summary.unparsed, 0);
}

#[test]
fn overwritten_part_appears_once_in_grid() {
    let mut data = prr("A", 0, 0);
    data.extend(prr("B", 1, 1));
    data.extend(prr("A", 1, 0));
    data.extend([0, 0, 0, 0]);

    let (parts, _) = collect_parts(Cursor::new(data)).unwrap();
    assert_eq!(parts.get("A"), Some(Coord { x: 1, y: 0 }));

    let grid = Grid::from_collector(&parts);
    assert_eq!(grid.cell(0, 0), None);
    assert_eq!(grid.cell(1, 0), Some("A"));
    assert_eq!(grid.filled(), 2);
}

#[test]
fn io_errors_surface() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    impl std::io::Seek for Broken {
        fn seek(&mut self, _: std::io::SeekFrom) -> std::io::Result<u64> {
            Ok(0)
        }
    }

    let mut parts = stdf_wafermap::CoordinateCollector::new();
    let result = StreamProcessor::new(Broken).process(&mut parts);
    assert_matches!(result, Err(ParseError::Io(_)));
}

#[test]
fn dump_output() {
    let mut out = Vec::new();
    dump_stream(Cursor::new(sample_stream()), &DumpConfig::default(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    insta::assert_snapshot!("dump_output", out.trim());
}

#[test]
fn grid_only_output() {
    let cfg = DumpConfig {
        dump_records: false,
        show_headers: false,
        show_parts: false,
        show_grid: true,
        cell_width: 4,
    };
    let mut out = Vec::new();
    dump_stream(Cursor::new(sample_stream()), &cfg, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    insta::assert_snapshot!("grid_only_output", out.trim());
}

fn write_lot(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("lot.stdf");
    std::fs::write(&path, sample_stream()).unwrap();
    path
}

#[test]
fn missing_file_writes_nothing() {
    let tmp = TempDir::new("stdf-wafermap-test").unwrap();
    let missing = tmp.path().join("missing.stdf");

    let mut out = Vec::new();
    let err = dump_file(&missing, &DumpConfig::default(), &mut out).unwrap_err();
    assert!(out.is_empty());
    assert!(format!("{:#}", err).contains("failed to open"));
}

#[test]
fn dump_file_reads_from_disk() {
    let tmp = TempDir::new("stdf-wafermap-test").unwrap();
    let path = write_lot(&tmp);

    let mut out = Vec::new();
    let (parts, summary) = dump_file(&path, &DumpConfig::default(), &mut out).unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(summary.malformed, 1);

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with(&format!("Reading {}\n", path.display())));
}

#[test]
fn failed_file_does_not_stop_the_run() {
    let tmp = TempDir::new("stdf-wafermap-test").unwrap();
    let missing = tmp.path().join("missing.stdf");
    let valid = write_lot(&tmp);

    let mut out = Vec::new();
    let mut err = Vec::new();
    let failed = cli::dump_files(
        &[missing.clone(), valid.clone()],
        &DumpConfig::default(),
        &mut out,
        &mut err,
    );
    assert_eq!(failed, vec![missing.clone()]);

    let out = String::from_utf8(out).unwrap();
    assert!(!out.contains(&missing.display().to_string()));
    assert!(out.starts_with(&format!("Reading {}\n", valid.display())));
    assert!(out.contains("Part Results Grid View"));

    let err = String::from_utf8(err).unwrap();
    assert!(err.contains(&format!("failed to open {}", missing.display())));
}

#[test]
fn run_without_inputs_prints_usage() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = cli::run(Vec::<String>::new(), &mut out, &mut err);
    assert_eq!(code, EXIT_USAGE);
    assert!(out.is_empty());
    assert_eq!(String::from_utf8(err).unwrap(), format!("{}\n", USAGE));
}

#[test]
fn run_with_missing_config_is_a_usage_error() {
    let tmp = TempDir::new("stdf-wafermap-test").unwrap();
    let valid = write_lot(&tmp);
    let args = vec![
        "-c".to_string(),
        tmp.path().join("nope.json").display().to_string(),
        valid.display().to_string(),
    ];

    let mut out = Vec::new();
    let mut err = Vec::new();
    assert_eq!(cli::run(args, &mut out, &mut err), EXIT_USAGE);
    assert!(out.is_empty());
}

#[test]
fn run_exit_codes() {
    let tmp = TempDir::new("stdf-wafermap-test").unwrap();
    let missing = tmp.path().join("missing.stdf");
    let valid = write_lot(&tmp);

    let mut out = Vec::new();
    let mut err = Vec::new();
    let args = vec![missing.display().to_string(), valid.display().to_string()];
    assert_eq!(cli::run(args, &mut out, &mut err), EXIT_FAILURE);
    assert!(String::from_utf8(out).unwrap().contains("Part Results Grid View"));

    let mut out = Vec::new();
    let mut err = Vec::new();
    assert_eq!(cli::run(vec![valid.display().to_string()], &mut out, &mut err), 0);
    assert!(err.is_empty());
}

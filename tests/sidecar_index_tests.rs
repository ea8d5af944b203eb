use std::collections::HashSet;
use std::fs;
use std::path::Path;

use docbrain_lib::core::config::SidecarIndexConfig;
use docbrain_lib::core::types::SidecarRecord;
use docbrain_lib::sidecar::index::{build_index, collect_records, is_sidecar_file_name};
use tempfile::TempDir;

// ── Test Helpers ──────────────────────────────────────────────────────────────

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    fs::write(path, contents).expect("write file");
}

/// A small manual library shaped like the real one.
fn manual_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path();

    write(
        &root.join("001 - 32223GT - Genie S-40, S-45/SN - 32223GT.txt"),
        b"Manual: 32223GT - Genie S-40, S-45\nToken : 32223GT\nSerial: SN: Prior to 0830\nFile  : C:\\M\\32223GT.pdf\n",
    );
    write(
        &root.join("002 - QR55 - Genie Z-30/SN - XYZ999.txt"),
        b"Serial: SN: 1000 to 2000\n",
    );
    write(
        &root.join("Loose/003 - QR56 - Genie Z-45/sn - .TXT"),
        b"Serial: all\n",
    );
    write(
        &root.join("Loose/SN - BAD1.txt"),
        b"Manual: BAD1 - Caf\xe9 \xff Lift\nSerial: \xfe\xfeSN 5\n",
    );
    write(&root.join("001 - 32223GT - Genie S-40, S-45/notes.txt"), b"Manual: X - Y\n");
    write(&root.join("001 - 32223GT - Genie S-40, S-45/SN - 32223GT.pdf"), b"%PDF-1.4");
    dir
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<SidecarRecord>) {
    let mut reader = csv::Reader::from_path(path).expect("open csv");
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<SidecarRecord>, _>>()
        .expect("rows");
    (headers, rows)
}

fn find<'a>(rows: &'a [SidecarRecord], file: &str) -> &'a SidecarRecord {
    rows.iter()
        .find(|row| row.sidecar_path.ends_with(file))
        .unwrap_or_else(|| panic!("no row for {file}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn index_has_one_row_per_sidecar_with_fixed_header() {
    let dir = manual_tree();
    let config = SidecarIndexConfig::new(dir.path());

    let summary = build_index(&config).expect("build index");
    assert_eq!(summary.rows, 4);

    let (headers, rows) = read_rows(&config.out_csv);
    assert_eq!(
        headers,
        vec!["manual_no", "model_title", "serial_text", "pdf_path", "sidecar_path"]
    );
    assert_eq!(rows.len(), 4);

    let full = find(&rows, "SN - 32223GT.txt");
    assert_eq!(full.manual_no, "32223GT");
    assert_eq!(full.model_title, "Genie S-40, S-45");
    assert_eq!(full.serial_text, "SN: Prior to 0830");
    assert_eq!(full.pdf_path, "C:\\M\\32223GT.pdf");

    let from_names = find(&rows, "SN - XYZ999.txt");
    assert_eq!(from_names.manual_no, "XYZ999");
    assert_eq!(from_names.model_title, "Genie Z-30");
    assert_eq!(from_names.serial_text, "SN: 1000 to 2000");
    assert_eq!(from_names.pdf_path, "");

    let from_folder = find(&rows, "sn - .TXT");
    assert_eq!(from_folder.manual_no, "QR56");
    assert_eq!(from_folder.model_title, "Genie Z-45");
}

#[test]
fn undecodable_bytes_are_dropped_not_fatal() {
    let dir = manual_tree();
    let rows = collect_records(dir.path());
    let bad = find(&rows, "SN - BAD1.txt");
    assert_eq!(bad.manual_no, "BAD1");
    assert_eq!(bad.model_title, "Caf  Lift");
    assert_eq!(bad.serial_text, "SN 5");
}

#[test]
fn rebuilding_unchanged_tree_gives_same_rows() {
    let dir = manual_tree();
    let config = SidecarIndexConfig::new(dir.path());

    build_index(&config).expect("first build");
    let (_, first) = read_rows(&config.out_csv);
    build_index(&config).expect("second build");
    let (_, second) = read_rows(&config.out_csv);

    let first: HashSet<SidecarRecord> = first.into_iter().collect();
    let second: HashSet<SidecarRecord> = second.into_iter().collect();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn every_row_points_at_an_existing_sidecar() {
    let dir = manual_tree();
    let config = SidecarIndexConfig::new(dir.path());
    build_index(&config).expect("build index");

    let (_, rows) = read_rows(&config.out_csv);
    for row in rows {
        let path = Path::new(&row.sidecar_path);
        assert!(path.is_file(), "{} should exist", row.sidecar_path);
        let name = path.file_name().and_then(|n| n.to_str()).expect("file name");
        assert!(is_sidecar_file_name(name), "{name} should qualify");
    }
}

#[test]
fn previous_index_is_overwritten_not_merged() {
    let dir = manual_tree();
    let out = dir.path().join("out/serials.csv");
    fs::create_dir_all(out.parent().expect("parent")).expect("out dir");
    fs::write(&out, "manual_no\nSTALE\nSTALE\nSTALE\nSTALE\nSTALE\nSTALE\n").expect("stale index");

    let config = SidecarIndexConfig::new(dir.path()).with_out_csv(&out);
    build_index(&config).expect("build index");

    let contents = fs::read_to_string(&out).expect("read index");
    assert!(!contents.contains("STALE"));
    assert_eq!(read_rows(&out).1.len(), 4);
}

#[test]
fn undeletable_previous_output_aborts_without_writing() {
    let dir = manual_tree();
    let out = dir.path().join("locked.csv");
    fs::create_dir_all(&out).expect("directory in place of index");

    let config = SidecarIndexConfig::new(dir.path()).with_out_csv(&out);
    let err = build_index(&config).expect_err("removal should fail");
    assert_eq!(err.code(), "IO_ERROR");
    assert!(err.to_string().contains("could not delete"));
    assert!(out.is_dir());
}

#[test]
fn empty_tree_still_writes_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = SidecarIndexConfig::new(dir.path());

    let summary = build_index(&config).expect("build index");
    assert_eq!(summary.rows, 0);
    let contents = fs::read_to_string(&config.out_csv).expect("read index");
    assert_eq!(
        contents.trim_end(),
        "manual_no,model_title,serial_text,pdf_path,sidecar_path"
    );
}

#[cfg(unix)]
#[test]
fn symlinked_sidecars_are_indexed() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().expect("temp dir");
    let store = dir.path().join("store/SN - 32223GT.txt");
    write(&store, b"Manual: 32223GT - Genie S-40\nSerial: all\n");

    let lib = dir.path().join("lib");
    let folder = lib.join("001 - 32223GT - Genie S-40");
    fs::create_dir_all(&folder).expect("folder");
    symlink(&store, folder.join("SN - 32223GT.txt")).expect("link to sidecar");
    symlink(dir.path().join("store"), lib.join("linked store")).expect("link to dir");

    let rows = collect_records(&lib);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].manual_no, "32223GT");
    assert_eq!(rows[0].serial_text, "all");
}

#[cfg(unix)]
#[test]
fn unreadable_sidecar_still_gets_a_row_from_fallbacks() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().expect("temp dir");
    let folder = dir.path().join("001 - QR9 - Genie Z-30");
    fs::create_dir_all(&folder).expect("folder");
    symlink(dir.path().join("missing.txt"), folder.join("SN - QR9.txt")).expect("dangling link");

    let config = SidecarIndexConfig::new(dir.path());
    let summary = build_index(&config).expect("build index");
    assert_eq!(summary.rows, 1);

    let (_, rows) = read_rows(&config.out_csv);
    let row = find(&rows, "SN - QR9.txt");
    assert_eq!(row.manual_no, "QR9");
    assert_eq!(row.model_title, "Genie Z-30");
    assert_eq!(row.serial_text, "");
    assert_eq!(row.pdf_path, "");
}

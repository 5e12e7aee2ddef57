// crates/huaweicm-rs/tests/robustness.rs

//! Error handling and edge cases: fatal path validation, malformed input
//! isolation, and CSV escaping of awkward parameter values.

use huaweicm_rs::{CmError, Converter};
use std::fs;
use std::path::{Path, PathBuf};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn data_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

fn read_table(dir: &Path, table: &str) -> String {
    fs::read_to_string(dir.join(format!("{}.csv", table))).unwrap()
}

/// An inaccessible input path fails before any processing.
#[test]
fn test_missing_input_is_fatal() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let result = Converter::new("/no/such/input.xml").run(out.path());
    assert!(
        matches!(result, Err(CmError::InputUnreadable(_))),
        "Expected InputUnreadable, got {:?}",
        result
    );
}

/// An existing input directory that cannot be read is the same fatal input
/// error, not a bare I/O error.
#[cfg(unix)]
#[test]
fn test_unreadable_input_directory_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not restrict root; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let out = tempfile::tempdir().unwrap();
    let result = Converter::new(&locked).run(out.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(
        matches!(result, Err(CmError::InputUnreadable(_))),
        "Expected InputUnreadable, got {:?}",
        result
    );
}

/// An output path that is not a directory fails before any processing.
#[test]
fn test_output_must_be_a_directory() {
    init_logging();
    // Nonexistent path.
    let result = Converter::new(data_path("input.xml")).run(Path::new("/no/such/outdir"));
    assert!(
        matches!(result, Err(CmError::OutputUnwritable(_))),
        "Expected OutputUnwritable, got {:?}",
        result
    );

    // Existing path that is a file.
    let file = tempfile::NamedTempFile::new().unwrap();
    let result = Converter::new(data_path("input.xml")).run(file.path());
    assert!(matches!(result, Err(CmError::OutputUnwritable(_))));
}

/// A malformed document as the sole input fails the run.
#[test]
fn test_malformed_single_file_fails() {
    init_logging();
    let out = tempfile::tempdir().unwrap();
    let result = Converter::new(data_path("malformed.xml")).run(out.path());
    assert!(
        matches!(result, Err(CmError::Xml(_))),
        "Expected Xml error, got {:?}",
        result
    );
}

/// A malformed file inside a directory run is skipped: the run succeeds and
/// the valid sibling is converted in full.
#[test]
fn test_malformed_file_in_directory_is_skipped() {
    init_logging();
    let input_dir = tempfile::tempdir().unwrap();
    for name in ["carryover.xml", "malformed.xml"] {
        fs::copy(data_path(name), input_dir.path().join(name)).unwrap();
    }

    let out = tempfile::tempdir().unwrap();
    Converter::new(input_dir.path())
        .run(out.path())
        .expect("directory run must tolerate one malformed file");

    // All rows come from the valid file.
    let ucell = read_table(out.path(), "UCELL");
    assert_eq!(ucell.lines().count(), 3);
    assert!(ucell.lines().skip(1).all(|l| l.starts_with("carryover.xml,")));

    let ne = read_table(out.path(), "SUBSESSION_NE");
    assert_eq!(ne.lines().count(), 3);
    assert!(!ne.contains("malformed.xml"));
}

/// Parameter values with quotes and commas survive the CSV round trip.
#[test]
fn test_quote_escaping_end_to_end() {
    init_logging();
    let input_dir = tempfile::tempdir().unwrap();
    fs::write(
        input_dir.path().join("quotes.xml"),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<bulkCmConfigDataFile xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <NE xsi:type="A" netype="X" neversion="1" neid="1">
    <module type="M" productversion="P" remark="R"/>
    <moi xsi:type="Cell">
      <attributes>
        <remark>He said, &quot;hi&quot;</remark>
      </attributes>
    </moi>
  </NE>
  <filefooter datetime="2020-01-01"/>
</bulkCmConfigDataFile>
"#,
    )
    .unwrap();

    let out = tempfile::tempdir().unwrap();
    Converter::new(input_dir.path()).run(out.path()).unwrap();

    let cell = read_table(out.path(), "Cell");
    assert_eq!(
        cell,
        "FileName,2020-01-01,ne_xsitype,netype,neversion,neid,module_type,module_remark,module_productversion,remark\n\
         quotes.xml,2020-01-01,A,X,1,1,M,R,P,\"He said, \"\"hi\"\"\"\n"
    );
}

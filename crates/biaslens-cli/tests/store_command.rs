use assert_cmd::Command;
use biaslens_cli::commands::{self, FilterArgs};
use biaslens_core::store::RecordReader;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[allow(deprecated)]
fn get_biaslens_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("biaslens")
}

#[test]
fn test_delete_removes_requested_ids() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("records.json");
    fs::copy(fixture_path("records.json"), &store).unwrap();

    let removed = commands::delete::execute(
        &store,
        &["a4".to_string(), "a5".to_string(), "zz".to_string()],
    )
    .unwrap();
    assert_eq!(removed, 2);

    let ids: Vec<String> = RecordReader::from_file(&store)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "a6"]);
}

#[test]
fn test_delete_unknown_id_leaves_store_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("records.json");
    fs::copy(fixture_path("records.json"), &store).unwrap();
    let before = fs::read_to_string(&store).unwrap();

    assert!(commands::delete::execute(&store, &["zz".to_string()]).is_err());
    assert_eq!(fs::read_to_string(&store).unwrap(), before);
}

#[test]
fn test_verify_finds_unsupported_evidence() {
    let mismatches =
        commands::verify::find_mismatches(&fixture_path("records.json"), &FilterArgs::default())
            .unwrap();

    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].record_id, "a6");
    assert_eq!(mismatches[0].pattern_index, 0);
    assert_eq!(mismatches[0].evidence_text, "women need not apply");
}

#[test]
fn test_verify_respects_filters() {
    let filters = FilterArgs {
        labels: vec!["TCS*".to_string()],
        ..FilterArgs::default()
    };
    let mismatches =
        commands::verify::find_mismatches(&fixture_path("records.json"), &filters).unwrap();
    assert!(mismatches.is_empty());
}

#[test]
fn test_export_table_output() {
    let mut cmd = Command::new(get_biaslens_bin());
    cmd.arg("--store")
        .arg(fixture_path("records.json"))
        .arg("export")
        .arg("-f")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Id,Label,Submitted At,Status,Biased,Confidence,Patterns,Bias Types,Highest Severity",
        ))
        .stdout(predicate::str::contains("2024-03-10T12:00:00Z"))
        .stdout(predicate::str::contains("academic_elitism"))
        .stdout(predicate::str::contains("a4,Wipro - Intern"));
}

#[test]
fn test_export_json_filtered() {
    let mut cmd = Command::new(get_biaslens_bin());
    cmd.arg("--store")
        .arg(fixture_path("records.json"))
        .arg("export")
        .arg("--min-severity")
        .arg("critical")
        .arg("-f")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"a3\""))
        .stdout(predicate::str::contains("\"highestSeverity\": \"critical\""))
        .stdout(predicate::str::contains("\"id\": \"a1\"").not());
}

#[test]
fn test_biased_and_clean_conflict() {
    let mut cmd = Command::new(get_biaslens_bin());
    cmd.arg("--store")
        .arg(fixture_path("records.json"))
        .arg("export")
        .arg("--biased")
        .arg("--clean");

    cmd.assert().failure();
}

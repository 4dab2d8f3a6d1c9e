use biaslens_cli::commands::{self, FilterArgs};
use biaslens_core::model::RecordStatus;
use biaslens_core::store::RecordReader;
use chrono::NaiveDate;
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

fn ids_after(filters: FilterArgs) -> Vec<String> {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("filtered.json");

    commands::filter::execute(&fixture_path("records.json"), &filters, Some(output.clone()))
        .unwrap();

    RecordReader::from_file(&output)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

/// Test filtering by bias verdict
#[test]
fn test_filter_biased() {
    let filters = FilterArgs {
        biased: true,
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a1", "a3", "a6"]);
}

/// Test filtering with a glob label pattern
#[test]
fn test_filter_label_glob() {
    let filters = FilterArgs {
        labels: vec!["Infosys*".to_string()],
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a3", "a5"]);
}

/// Test filtering with comma-separated exact labels
#[test]
fn test_filter_label_list() {
    let filters = FilterArgs {
        labels: vec!["tcs - sde, notes.txt".to_string()],
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a1", "a6"]);
}

#[test]
fn test_filter_status_and_severity() {
    let filters = FilterArgs {
        status: Some("failed".to_string()),
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a5"]);

    let filters = FilterArgs {
        min_severity: Some("critical".to_string()),
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a3"]);
}

#[test]
fn test_filter_date_range() {
    // Records sit at 12:00 UTC, far enough from local midnight in any zone
    // between UTC-11 and UTC+11
    let filters = FilterArgs {
        since: NaiveDate::from_ymd_opt(2024, 3, 11),
        until: NaiveDate::from_ymd_opt(2024, 3, 12),
        ..FilterArgs::default()
    };
    assert_eq!(ids_after(filters), vec!["a2", "a3"]);
}

/// Filtered output must be readable as a store again, statuses intact
#[test]
fn test_filter_output_round_trips_outcomes() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("all.json");

    commands::filter::execute(
        &fixture_path("records.json"),
        &FilterArgs::default(),
        Some(output.clone()),
    )
    .unwrap();

    let original = RecordReader::from_file(&fixture_path("records.json")).unwrap();
    let rewritten = RecordReader::from_file(&output).unwrap();
    assert_eq!(original, rewritten);
    assert_eq!(rewritten[3].status(), RecordStatus::Pending);
    assert_eq!(rewritten[4].status(), RecordStatus::Failed);
}

#[test]
fn test_filter_invalid_status() {
    let temp_dir = TempDir::new().unwrap();
    let filters = FilterArgs {
        status: Some("archived".to_string()),
        ..FilterArgs::default()
    };

    let result = commands::filter::execute(
        &fixture_path("records.json"),
        &filters,
        Some(temp_dir.path().join("out.json")),
    );
    assert!(result.is_err());
}

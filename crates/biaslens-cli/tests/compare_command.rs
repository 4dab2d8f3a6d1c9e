use assert_cmd::Command;
use biaslens_cli::commands;
use biaslens_core::compare::StatusTransition;
use predicates::prelude::*;
use std::path::PathBuf;

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
fn test_compare_clean_to_biased() {
    let view =
        commands::compare::compare_records(&fixture_path("records.json"), "a2", "a1").unwrap();

    assert_eq!(view.left.id, "a2");
    assert_eq!(view.right.source_label, "TCS - SDE");
    assert_eq!(view.diff.status_transition, StatusTransition::Regressed);
    assert_eq!(
        view.diff.types_only_in_right,
        vec!["academic_elitism", "gender_bias"]
    );
    assert!(view.diff.types_only_in_left.is_empty());
    assert!(view.diff.types_in_both.is_empty());
    assert_eq!(view.diff.pattern_count_delta, 2);
    assert_eq!(view.diff.confidence_delta, -10);
}

#[test]
fn test_compare_two_biased_records() {
    let view =
        commands::compare::compare_records(&fixture_path("records.json"), "a1", "a6").unwrap();

    assert_eq!(view.diff.status_transition, StatusTransition::BothBiased);
    assert_eq!(view.diff.types_in_both, vec!["gender_bias"]);
    assert_eq!(view.diff.types_only_in_left, vec!["academic_elitism"]);
    assert_eq!(view.diff.pattern_count_delta, -1);
    assert_eq!(view.diff.confidence_delta, -20);
}

#[test]
fn test_compare_pending_record_is_rejected() {
    let err = commands::compare::compare_records(&fixture_path("records.json"), "a4", "a1")
        .unwrap_err();

    let core = err.downcast_ref::<biaslens_core::Error>().unwrap();
    assert!(matches!(
        core,
        biaslens_core::Error::ComparisonNotReady { id, .. } if id == "a4"
    ));
}

#[test]
fn test_compare_unknown_id() {
    let err = commands::compare::compare_records(&fixture_path("records.json"), "a1", "zz")
        .unwrap_err();

    let core = err.downcast_ref::<biaslens_core::Error>().unwrap();
    assert!(matches!(core, biaslens_core::Error::NotFound(id) if id == "zz"));
}

#[test]
fn test_compare_cli_json() {
    let mut cmd = Command::new(get_biaslens_bin());
    cmd.arg("--store")
        .arg(fixture_path("records.json"))
        .arg("compare")
        .arg("a2")
        .arg("a1")
        .arg("-f")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"statusTransition\": \"Regressed\""))
        .stdout(predicate::str::contains("\"confidenceDelta\": -10"));
}

#[test]
fn test_compare_cli_failed_record() {
    let mut cmd = Command::new(get_biaslens_bin());
    cmd.arg("--store")
        .arg(fixture_path("records.json"))
        .arg("compare")
        .arg("a1")
        .arg("a5");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("a5"));
}

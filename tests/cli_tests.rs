use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a blockscan command
fn blockscan_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("blockscan"))
}

/// Write a denylist and two input files, returning their paths
fn fixture(temp_dir: &TempDir) -> (PathBuf, PathBuf, PathBuf) {
    let denylist = temp_dir.path().join("denylist.txt");
    let docs_a = temp_dir.path().join("docs_a.txt");
    let docs_b = temp_dir.path().join("docs_b.txt");

    fs::write(&denylist, "Acme Corp\n\n  GLOBEX  \nacme corp\n").unwrap();
    fs::write(
        &docs_a,
        "Acme Corp is listed\nunrelated text\n\nnothing to see\nInitech\n",
    )
    .unwrap();
    fs::write(&docs_b, "Supplier: Globex.\n\nglobexian empire\n").unwrap();

    (denylist, docs_a, docs_b)
}

#[test]
fn test_help() {
    blockscan_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Whole-word denylist detection"));
}

#[test]
fn test_version() {
    blockscan_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blockscan"));
}

#[test]
fn test_check_help() {
    blockscan_cmd()
        .arg("check")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare the matchers"));
}

#[test]
fn test_check_table() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, docs_b) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg(&docs_b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Denylist phrases: 2"))
        .stdout(predicate::str::contains("Blocks to check:  4"))
        .stdout(predicate::str::contains("Aho-Corasick"))
        .stdout(predicate::str::contains("Inverted index"))
        .stdout(predicate::str::contains("SIMD byte scan"))
        .stdout(predicate::str::contains("All matchers flagged the same blocks."));
}

#[test]
fn test_check_details() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, docs_b) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg(&docs_b)
        .arg("--details")
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("Blocks containing denylisted phrases: 2"))
        .stdout(predicate::str::contains("File: docs_a.txt"))
        .stdout(predicate::str::contains("Detected by: automaton, index, vector (3 of 3)"))
        .stdout(predicate::str::contains("Denylisted lines in this block: 1"));
}

#[test]
fn test_check_json() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, docs_b) = fixture(&temp_dir);

    let output = blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg(&docs_b)
        .arg("--format")
        .arg("json")
        .arg("--parallel")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["phrase_count"], 2);
    assert_eq!(report["block_count"], 4);
    assert_eq!(report["runs"].as_array().unwrap().len(), 3);
    assert_eq!(report["comparison"]["disagreeing_blocks"], 0);

    let detections = report["detections"].as_array().unwrap();
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0]["number"], 1);
}

#[test]
fn test_check_csv_single_matcher() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg("--matchers")
        .arg("vector")
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "source,block,detected_by,detection_count,lines",
        ))
        .stdout(predicate::str::contains(",1,vector,1,Acme Corp is listed | unrelated text"));
}

#[test]
fn test_check_unknown_matcher() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg("--matchers")
        .arg("regex")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown matcher 'regex'"));
}

#[test]
fn test_check_missing_input_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, docs_a, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(&denylist)
        .arg(&docs_a)
        .arg(temp_dir.path().join("missing.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("input file not found"));
}

#[test]
fn test_check_missing_denylist() {
    let temp_dir = TempDir::new().unwrap();
    let (_, docs_a, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("check")
        .arg("-d")
        .arg(temp_dir.path().join("nope.txt"))
        .arg(&docs_a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load denylist"));
}

#[test]
fn test_query_match() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, _, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("query")
        .arg("-d")
        .arg(&denylist)
        .arg("Supplier:   ACME corp.")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"matched\": true"))
        .stdout(predicate::str::contains("\"phrase\": \"acme corp\""));
}

#[test]
fn test_query_no_match_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, _, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("query")
        .arg("-d")
        .arg(&denylist)
        .arg("--matcher")
        .arg("index")
        .arg("Acme Corporation")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"matched\": false"));
}

#[test]
fn test_query_quiet() {
    let temp_dir = TempDir::new().unwrap();
    let (denylist, _, _) = fixture(&temp_dir);

    blockscan_cmd()
        .arg("query")
        .arg("-d")
        .arg(&denylist)
        .arg("-q")
        .arg("globex")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

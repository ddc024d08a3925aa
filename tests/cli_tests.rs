//! Command-line behavior of the `sortfiles` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sortfiles() -> Command {
    Command::cargo_bin("sortfiles").expect("binary is built")
}

#[test]
fn test_help_lists_main_flags() {
    sortfiles()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--delete-source"))
        .stdout(predicate::str::contains("--on-duplicate"));
}

#[test]
fn test_dry_run_reports_without_writing() {
    let temp = TempDir::new().expect("create tempdir");
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    fs::create_dir_all(&src).expect("mkdir");
    fs::write(src.join("a.jpg"), b"img").expect("write");

    sortfiles()
        .arg(&src)
        .arg(&dest)
        .arg("--dry-run")
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"))
        .stdout(predicate::str::contains("Copied: 1"));

    assert!(!dest.exists());
    assert!(src.join("a.jpg").exists());
}

#[test]
fn test_move_with_type_filter() {
    let temp = TempDir::new().expect("create tempdir");
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    fs::create_dir_all(&src).expect("mkdir");
    fs::write(src.join("a.jpg"), b"img").expect("write");
    fs::write(src.join("b.mp3"), b"snd").expect("write");

    sortfiles()
        .arg(&src)
        .arg(&dest)
        .args(["--delete-source", "--type", "image", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved: 1"));

    assert!(dest.join("images/a.jpg").exists());
    assert!(!src.join("a.jpg").exists());
    assert!(src.join("b.mp3").exists());
}

#[test]
fn test_json_emits_one_event_per_line() {
    let temp = TempDir::new().expect("create tempdir");
    let src = temp.path().join("src");
    let dest = temp.path().join("dest");
    fs::create_dir_all(&src).expect("mkdir");
    fs::write(src.join("a.txt"), b"doc").expect("write");

    let output = sortfiles()
        .arg(&src)
        .arg(&dest)
        .arg("--json")
        .output()
        .expect("run sortfiles");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect();

    assert!(events.iter().any(|e| e["type"] == "operation"));
    let last = events.last().expect("at least one event");
    assert_eq!(last["type"], "summary");
    assert_eq!(last["data"]["completed"], true);
    assert_eq!(last["data"]["copied"], 1);
}

#[test]
fn test_missing_source_fails() {
    let temp = TempDir::new().expect("create tempdir");

    sortfiles()
        .arg(temp.path().join("missing"))
        .arg(temp.path().join("dest"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_destination_inside_source_fails() {
    let temp = TempDir::new().expect("create tempdir");
    let src = temp.path().join("src");
    fs::create_dir_all(&src).expect("mkdir");

    sortfiles()
        .arg(&src)
        .arg(src.join("sorted"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

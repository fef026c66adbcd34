//! Binary-level tests for the wellplan commands

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use wellplan::config::paths::WellplanPaths;
use wellplan::models::{CheckInRecord, PlanRecord, ProfileRecord, Zone};
use wellplan::store::JsonFileStore;

fn wellplan(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wellplan").unwrap();
    cmd.env("WELLPLAN_DATA_DIR", data_dir)
        .env_remove("WELLPLAN_PASSPHRASE")
        .env_remove("WELLPLAN_LOG");
    cmd
}

fn seed(data_dir: &Path) {
    let paths = WellplanPaths::with_base_dir(data_dir.to_path_buf());
    paths.ensure_directories().unwrap();
    let store = JsonFileStore::new(paths.records_file());
    store
        .install_plan(PlanRecord::new(
            "p1",
            "rev-1",
            1,
            "CODE1",
            json!({"skills": [], "crisisResources": []}),
            "install-1",
        ))
        .unwrap();
    let mut profile = ProfileRecord::new("Alex");
    profile.onboarding_complete = true;
    store.save_profile(profile).unwrap();
    store
        .record_check_in(CheckInRecord::new("p1", Zone::Green))
        .unwrap();
}

fn export_backup(data_dir: &Path, out_dir: &Path, passphrase: &str) -> PathBuf {
    wellplan(data_dir)
        .env("WELLPLAN_PASSPHRASE", passphrase)
        .args(["export", "--nickname", "Alex", "--output-dir"])
        .arg(out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup written to:"))
        .stdout(predicate::str::contains(
            "Content type: application/octet-stream",
        ))
        .stdout(predicate::str::contains("Check-ins: 1"));

    let mut files: Vec<_> = std::fs::read_dir(out_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    files.remove(0)
}

#[test]
fn export_then_restore_on_fresh_device() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed(source.path());

    let backup = export_backup(source.path(), out.path(), "correct-horse");
    let name = backup.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("alex-backup-"));
    assert!(name.ends_with(".wbap"));

    let target = TempDir::new().unwrap();
    wellplan(target.path())
        .env("WELLPLAN_PASSPHRASE", "correct-horse")
        .arg("restore")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Restored: plan p1, profile for Alex, 1 check-ins",
        ));

    wellplan(target.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: p1"))
        .stdout(predicate::str::contains("Local id: plan-"))
        .stdout(predicate::str::contains("Profile: Alex (prof-"))
        .stdout(predicate::str::contains("Check-ins: 1"));
}

#[test]
fn empty_passphrase_backup_can_be_restored() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed(source.path());

    wellplan(source.path())
        .env("WELLPLAN_PASSPHRASE", "")
        .args(["export", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("the passphrase is empty"));
    let backup = std::fs::read_dir(out.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();

    let target = TempDir::new().unwrap();
    wellplan(target.path())
        .env("WELLPLAN_PASSPHRASE", "")
        .arg("restore")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored: plan p1"));
}

#[test]
fn restore_with_wrong_passphrase_fails() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed(source.path());
    let backup = export_backup(source.path(), out.path(), "correct-horse");

    let target = TempDir::new().unwrap();
    wellplan(target.path())
        .env("WELLPLAN_PASSPHRASE", "battery-staple")
        .arg("restore")
        .arg(&backup)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not decrypt backup"));

    wellplan(target.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan installed."));
}

#[test]
fn restore_over_existing_plan_needs_confirmation() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed(source.path());
    let backup = export_backup(source.path(), out.path(), "pw");

    wellplan(source.path())
        .env("WELLPLAN_PASSPHRASE", "pw")
        .arg("restore")
        .arg(&backup)
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    wellplan(source.path())
        .env("WELLPLAN_PASSPHRASE", "pw")
        .args(["restore", "--force"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored: plan p1"));
}

#[test]
fn export_without_plan_reports_not_found() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    wellplan(data.path())
        .env("WELLPLAN_PASSPHRASE", "pw")
        .args(["export", "--output-dir"])
        .arg(out.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("no installed plan"))
        .stderr(predicate::str::contains("Plan not found"));
}

#[test]
fn inspect_describes_backup() {
    let source = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed(source.path());
    let backup = export_backup(source.path(), out.path(), "pw");

    wellplan(source.path())
        .arg("inspect")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Format version: 1"))
        .stdout(predicate::str::contains("Can be restored by this version: yes"));
}

#[test]
fn inspect_rejects_non_backup_files() {
    let dir = TempDir::new().unwrap();

    let wrong_ext = dir.path().join("notes.txt");
    std::fs::write(&wrong_ext, "hello").unwrap();
    wellplan(dir.path())
        .arg("inspect")
        .arg(&wrong_ext)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a backup file"));

    let garbage = dir.path().join("plan.wbap");
    std::fs::write(&garbage, "definitely not json").unwrap();
    wellplan(dir.path())
        .arg("inspect")
        .arg(&garbage)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a wellbeing plan backup file"));
}

#[test]
fn restore_future_version_is_hard_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("future.wbap");
    std::fs::write(
        &file,
        r#"{"version": 2, "salt": "AAAAAAAAAAAAAAAAAAAAAA==", "iv": "AAAAAAAAAAAAAAAA", "data": "AAAA"}"#,
    )
    .unwrap();

    wellplan(dir.path())
        .env("WELLPLAN_PASSPHRASE", "pw")
        .arg("restore")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Restore failed"))
        .stderr(predicate::str::contains("version 2"));
}

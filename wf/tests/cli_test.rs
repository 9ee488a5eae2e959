//! Binary tests for the `wf` command
//!
//! Every test points the keystore and log directory into a temp dir and never
//! stores an itinerary or flight key that would trigger a network call.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    temp: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = temp.path().join("wayfarer.yml");
        let keystore = temp.path().join("keys").join("credentials.yml");
        std::fs::write(
            &config,
            format!("storage:\n  keystore-path: {}\n", keystore.display()),
        )
        .expect("Failed to write config");
        Self { temp, config }
    }

    fn keystore(&self) -> PathBuf {
        self.temp.path().join("keys").join("credentials.yml")
    }

    fn data_dir(&self) -> &Path {
        self.temp.path()
    }

    fn wf(&self) -> Command {
        let mut cmd = Command::cargo_bin("wf").expect("binary should build");
        cmd.env("XDG_DATA_HOME", self.data_dir())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

#[test]
fn test_key_set_show_clear() {
    let env = Env::new();

    env.wf()
        .args(["key", "set", "flights", "serp-abcdefghijkl-9876"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved flights key"));
    assert!(env.keystore().exists());

    env.wf()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("serp-"))
        .stdout(predicate::str::contains("9876"))
        .stdout(predicate::str::contains("serp-abcdefghijkl-9876").not())
        .stdout(predicate::str::contains("(not set)"));

    env.wf().args(["key", "clear", "flights"]).assert().success();

    env.wf()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9876").not());
}

#[test]
fn test_key_unknown_service_fails() {
    let env = Env::new();
    env.wf().args(["key", "set", "hotels", "x"]).assert().failure();
}

#[test]
fn test_flights_without_key_prints_demo_data() {
    let env = Env::new();

    env.wf()
        .args(["flights", "--from", "DEL", "--to", "HAN", "--date", "2025-03-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data"))
        .stdout(predicate::str::contains("DEL 17:05"))
        .stdout(predicate::str::contains("HAN 05:35"))
        .stdout(predicate::str::contains("$299"));
}

#[test]
fn test_plan_with_missing_fields_fails_validation() {
    let env = Env::new();

    env.wf()
        .args(["plan", "--from", "DEL"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in all fields (destination is missing)"));
}

#[test]
fn test_plan_end_before_start_fails_validation() {
    let env = Env::new();

    env.wf()
        .args([
            "plan",
            "--from",
            "DEL",
            "--to",
            "HAN",
            "--start",
            "2025-03-10",
            "--end",
            "2025-03-07",
            "--budget",
            "1500",
            "--travelers",
            "2",
            "--interests",
            "food",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before start date"));
}

#[test]
fn test_plan_without_itinerary_key_asks_for_one() {
    let env = Env::new();

    env.wf()
        .args([
            "plan",
            "--from",
            "DEL",
            "--to",
            "HAN",
            "--start",
            "2025-03-07",
            "--end",
            "2025-03-10",
            "--budget",
            "1500",
            "--travelers",
            "2",
            "--interests",
            "food",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No itinerary API key configured"));
}

#[test]
fn test_plan_with_non_numeric_budget_fails_validation() {
    let env = Env::new();

    env.wf()
        .args([
            "plan",
            "--from",
            "DEL",
            "--to",
            "HAN",
            "--start",
            "2025-03-07",
            "--end",
            "2025-03-10",
            "--budget",
            "lots",
            "--travelers",
            "2",
            "--interests",
            "food",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid number for budget"));
}

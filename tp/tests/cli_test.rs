//! Binary tests for the tp command
//!
//! Every run gets its own HOME so logs and user config stay inside a temp dir.

use assert_cmd::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const ANSWERS: &str = r#"
personal_info: Two adults and a teenager
travel_destination: Rome
travel_dates: 5 days in May
budget: "$3000"
interests: food and history
accommodation: apartment
"#;

fn tp(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tp").expect("bin");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"));
    cmd
}

fn write_config(dir: &Path, local_url: &str) -> std::path::PathBuf {
    let path = dir.join("tp.yml");
    let yaml = format!(
        "hosted:\n  api-key-env: TP_TEST_UNSET_KEY\nlocal:\n  base-url: {}\n  model: llama3.2\n",
        local_url
    );
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();
    tp(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_plan_missing_answers_file() {
    let tmp = TempDir::new().unwrap();
    tp(tmp.path())
        .args(["plan", "--answers", "missing.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read answers"));
}

#[test]
fn test_plan_unknown_backend_rejected() {
    let tmp = TempDir::new().unwrap();
    tp(tmp.path())
        .args(["plan", "--answers", "a.yml", "--backend", "bard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}

#[test]
fn test_plan_with_local_backend_writes_output() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body_partial(r#"{"model":"llama3.2","stream":false}"#)
            .body_contains("Rome");
        then.status(200)
            .json_body(serde_json::json!({"response": "Day 1: Colosseum", "done": true}));
    });

    let config = write_config(tmp.path(), &server.base_url());
    fs::write(tmp.path().join("answers.yml"), ANSWERS).unwrap();

    tp(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["plan", "--answers", "answers.yml", "--backend", "local", "--output", "plan.txt"])
        .assert()
        .success();

    mock.assert();
    let plan = fs::read_to_string(tmp.path().join("plan.txt")).unwrap();
    assert_eq!(plan, "Day 1: Colosseum");
}

#[test]
fn test_plan_missing_required_answer() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "http://127.0.0.1:9");
    fs::write(tmp.path().join("answers.yml"), "travel_destination: Rome\n").unwrap();

    tp(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["plan", "--answers", "answers.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Personal Info is required"));
}

#[test]
fn test_plan_without_api_key_reports_error() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "http://127.0.0.1:9");
    fs::write(tmp.path().join("answers.yml"), ANSWERS).unwrap();

    tp(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["plan", "--answers", "answers.yml", "--backend", "hosted"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: API key not found"))
        .stdout(predicate::str::contains("TP_TEST_UNSET_KEY"));
}

#[test]
fn test_plan_compare_shows_both_labels() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).json_body(serde_json::json!({"response": "Pasta tour"}));
    });

    let config = write_config(tmp.path(), &server.base_url());
    fs::write(tmp.path().join("answers.yml"), ANSWERS).unwrap();

    tp(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["plan", "--answers", "answers.yml", "--compare"])
        .assert()
        .success()
        .stdout(predicate::str::contains("===== OpenAI Plan ====="))
        .stdout(predicate::str::contains("Error: API key not found"))
        .stdout(predicate::str::contains("===== Llama 3.2 Plan =====\n\nPasta tour"));
}

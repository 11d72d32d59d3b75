//! End-to-end CLI tests using `assert_cmd`.
//!
//! These tests invoke the compiled binary and verify exit codes and output.
//! They do NOT require Ollama or the weather API (except tests marked #[ignore]).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn cmd() -> Command {
    Command::cargo_bin("agrorag").unwrap()
}

/// Config file inside `dir` with all paths and upstreams kept local
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    let content = format!(
        r#"data_dir = "{data}"
store_dir = "{store}"

[weather]
api_key = "test-key"
base_url = "http://127.0.0.1:9/v1"
default_location = "Curitiba"
"#,
        data = dir.join("data").display(),
        store = dir.join("store").display(),
    );
    fs::write(&path, content).unwrap();
    path
}

fn configured() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());
    (dir, config)
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("weather"));
}

#[test]
fn test_version_shows_name() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("agrorag"));
}

// ─── Argument validation ────────────────────────────────────────────────

#[test]
fn test_ingest_help() {
    cmd()
        .args(["ingest", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reset"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_query_requires_question() {
    cmd()
        .arg("query")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_serve_rejects_invalid_port() {
    cmd()
        .args(["serve", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_weather_rejects_invalid_date() {
    cmd()
        .args(["weather", "--start", "2024-13-01", "--end", "2024-03-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─── Init ───────────────────────────────────────────────────────────────

#[test]
fn test_init_writes_config_to_env_path() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));

    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("[weather]"));
    assert!(written.contains("${WEATHER_API_KEY}"));
    assert!(written.contains("Curitiba"));
}

#[test]
fn test_init_keeps_existing_config_without_force() {
    let (_dir, config) = configured();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert!(fs::read_to_string(&config).unwrap().contains("test-key"));
}

// ─── Commands that need a configuration ─────────────────────────────────

#[test]
fn test_ingest_without_config_points_to_init() {
    let dir = tempdir().unwrap();

    cmd()
        .env("AGRORAG_CONFIG", dir.path().join("missing.toml"))
        .arg("ingest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("agrorag init"));
}

#[test]
fn test_ingest_empty_corpus_adds_nothing() {
    let (dir, config) = configured();
    fs::create_dir_all(dir.path().join("data").join("pdf")).unwrap();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .arg("ingest")
        .assert()
        .success()
        .stdout(predicate::str::contains("No new chunks to add."))
        .stdout(predicate::str::contains("Store now holds 0 chunks"));
}

#[test]
fn test_ingest_reset_clears_store() {
    let (dir, config) = configured();
    fs::create_dir_all(dir.path().join("data").join("pdf")).unwrap();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .arg("ingest")
        .assert()
        .success();
    let store_dir = dir.path().join("store");
    assert!(store_dir.join("chunks.db").exists());
    fs::write(store_dir.join("stale.bin"), "left over").unwrap();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .args(["ingest", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared vector store"))
        .stdout(predicate::str::contains("Store now holds 0 chunks"));

    assert!(!store_dir.join("stale.bin").exists());
    assert!(store_dir.join("chunks.db").exists());
}

#[test]
fn test_ingest_without_existing_store_does_not_report_clearing() {
    let (dir, config) = configured();
    fs::create_dir_all(dir.path().join("data").join("pdf")).unwrap();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .args(["ingest", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared vector store").not());
}

#[test]
fn test_weather_reversed_range_fails() {
    let (_dir, config) = configured();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .args(["weather", "--start", "2024-03-05", "--end", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is after"));
}

#[test]
fn test_weather_unreachable_upstream_reports_each_day() {
    let (dir, config) = configured();
    let output = dir.path().join("out").join("weather.json");

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .args(["weather", "--start", "2024-03-02", "--end", "2024-03-03"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("2024-03-02"))
        .stderr(predicate::str::contains("2024-03-03"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!([]));
}

// ─── Integration: live upstreams ────────────────────────────────────────

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn test_query_with_ollama() {
    let (_dir, config) = configured();

    cmd()
        .env("AGRORAG_CONFIG", &config)
        .args(["query", "--query", "Which days are ideal for planting corn?"])
        .timeout(std::time::Duration::from_secs(300))
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer:"));
}

#[test]
#[ignore]
fn test_weather_with_live_api() {
    cmd()
        .args(["weather", "--start", "2024-03-02", "--end", "2024-03-03"])
        .timeout(std::time::Duration::from_secs(60))
        .assert()
        .success()
        .stdout(predicate::str::contains("avg_temp_c"));
}

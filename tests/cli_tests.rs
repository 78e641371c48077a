//! CLI behavior via the built binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn check_config_accepts_a_valid_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(
        &dir,
        r#"
[dashboard]
timezone = "-06:00"
daily_alert_threshold = 10
"#,
    );

    Command::cargo_bin("vigia")
        .expect("binary")
        .args(["check", "config", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("config valid"))
        .stdout(predicate::str::contains("-06:00"));
}

#[test]
fn check_config_rejects_an_invalid_timezone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, "[dashboard]\ntimezone = \"local\"\n");

    Command::cargo_bin("vigia")
        .expect("binary")
        .args(["check", "config", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dashboard.timezone"));
}

#[test]
fn run_once_renders_a_seeded_dashboard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let seed = dir.path().join("seed.json");
    std::fs::write(
        &seed,
        r#"{
  "reports": [
    {"id": "r1", "description": "pothole", "tags": ["Bache"], "neighborhood": "Centro", "created_at": "2026-08-20T15:00:00Z"},
    {"id": "r2", "description": "dark street", "tags": ["Alumbrado"], "created_at": "bad-timestamp"}
  ],
  "users": [
    {"id": "u1", "created_at": "2026-08-01T10:00:00Z"}
  ]
}"#,
    )
    .expect("write seed");

    let config = write_config(
        &dir,
        &format!(
            r#"
[store]
backend = "memory"
seed = "{}"

[logging]
level = "error"
"#,
            seed.display()
        ),
    );

    Command::cargo_bin("vigia")
        .expect("binary")
        .args(["run", "--once", "-c"])
        .arg(&config)
        .assert()
        .success()
        // Both documents count toward the total, including the undated one.
        .stdout(predicate::str::contains("Total reports    2"))
        .stdout(predicate::str::contains("Total users      1"))
        .stdout(predicate::str::contains("This week"));
}

#[test]
fn submit_inserts_into_the_memory_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, "[logging]\nlevel = \"error\"\n");

    Command::cargo_bin("vigia")
        .expect("binary")
        .args([
            "submit",
            "--description",
            "fallen tree",
            "--tag",
            "Arbolado",
            "-l",
            "Norte",
            "-c",
        ])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("report submitted"));
}

#[test]
fn missing_config_fails_with_read_error() {
    Command::cargo_bin("vigia")
        .expect("binary")
        .args(["run", "--once", "-c", "no-such-config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

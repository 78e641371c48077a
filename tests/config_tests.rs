//! Configuration loading and validation.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use vigia::config::{Backend, Config};
use vigia::error::{ConfigError, Error};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("vigia-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

fn load(contents: &str) -> Result<Config, Error> {
    let path = write_temp_config(contents);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    result
}

#[test]
fn empty_config_uses_defaults() {
    let config = load("").expect("defaults are valid");
    assert_eq!(config.store.backend, Backend::Memory);
    assert_eq!(config.dashboard.timezone, "+00:00");
    assert_eq!(config.dashboard.daily_alert_threshold, 40);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn remote_backend_requires_ws_url() {
    let result = load("[store]\nbackend = \"remote\"");
    match result {
        Err(Error::Config(ConfigError::MissingField {
            field: "store.ws_url",
        })) => {}
        other => panic!("expected missing ws_url error, got {other:?}"),
    }
}

#[test]
fn remote_backend_rejects_non_websocket_schemes() {
    let toml = r#"
[store]
backend = "remote"
ws_url = "https://store.example.com"
"#;
    match load(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "store.ws_url",
            ..
        })) => {}
        other => panic!("expected invalid scheme error, got {other:?}"),
    }
}

#[test]
fn invalid_timezone_is_rejected() {
    let toml = r#"
[dashboard]
timezone = "America/Mexico_City"
"#;
    match load(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "dashboard.timezone",
            ..
        })) => {}
        other => panic!("expected invalid timezone error, got {other:?}"),
    }
}

#[test]
fn backoff_multiplier_must_exceed_one() {
    let toml = r#"
[store.reconnect]
backoff_multiplier = 0.5
"#;
    match load(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "store.reconnect.backoff_multiplier",
            ..
        })) => {}
        other => panic!("expected invalid multiplier error, got {other:?}"),
    }
}

#[test]
fn valid_remote_config_parses_offset() {
    let toml = r#"
[store]
backend = "remote"
ws_url = "wss://store.example.com/live"

[dashboard]
timezone = "-06:00"
daily_alert_threshold = 25
"#;
    let config = load(toml).expect("valid config");
    assert_eq!(config.store.backend, Backend::Remote);
    assert_eq!(config.dashboard.daily_alert_threshold, 25);
    assert_eq!(config.offset().expect("offset").local_minus_utc(), -6 * 3600);
}

#[test]
fn missing_file_surfaces_read_error() {
    match Config::load("definitely-not-here.toml") {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

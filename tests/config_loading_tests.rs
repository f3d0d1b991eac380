// Config loading tests - testing AppConfig::load and validation errors

use feastedchat::config::{AppConfig, ConfigError};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("feasted.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn returns_error_when_explicit_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/feasted.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn empty_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AppConfig::load(Some(&path)).expect("load");
    assert_eq!(config.server.bind.to_string(), "127.0.0.1:8080");
    assert!(config.server.allowed_origins.is_empty());
    assert_eq!(config.round.timeout, Duration::from_secs(15));
    assert_eq!(config.round.proxy_url, "http://127.0.0.1:8080/api/response");
    assert_eq!(config.keys.path, Path::new("config/api_keys.json"));
}

#[test]
fn reads_every_section() {
    let dir = tempdir().expect("tempdir");
    let keys_path = dir.path().join("keys.json");
    let path = write_config(
        dir.path(),
        &format!(
            r#"
[server]
bind = "0.0.0.0:9000"
allowed_origins = ["http://localhost:5173"]

[round]
timeout_ms = 2500
proxy_url = "http://10.0.0.2:9000/api/response"

[keys]
path = "{}"
"#,
            keys_path.display()
        ),
    );

    let config = AppConfig::load(Some(&path)).expect("load");
    assert_eq!(config.server.bind.port(), 9000);
    assert_eq!(config.server.allowed_origins, ["http://localhost:5173"]);
    assert_eq!(config.round.timeout, Duration::from_millis(2500));
    assert_eq!(config.round.proxy_url, "http://10.0.0.2:9000/api/response");
    assert_eq!(config.keys.path, keys_path);
}

#[test]
fn returns_error_for_invalid_bind() {
    let result = AppConfig::from_toml_str("[server]\nbind = \"localhost\"\n");
    assert!(matches!(result, Err(ConfigError::InvalidBind { value }) if value == "localhost"));
}

#[test]
fn returns_error_for_zero_timeout() {
    let result = AppConfig::from_toml_str("[round]\ntimeout_ms = 0\n");
    assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
}

#[test]
fn returns_error_for_invalid_proxy_url() {
    let result = AppConfig::from_toml_str("[round]\nproxy_url = \"not a url\"\n");
    assert!(matches!(result, Err(ConfigError::InvalidProxyUrl { .. })));
}

#[test]
fn returns_parse_error_for_malformed_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[server\nbind = ");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn keys_path_expands_environment_variables() {
    // SAFETY: single-threaded set of a variable no other test reads
    unsafe { std::env::set_var("FEASTED_TEST_KEYS_DIR", "/tmp/feasted") };
    let config =
        AppConfig::from_toml_str("[keys]\npath = \"$FEASTED_TEST_KEYS_DIR/keys.json\"\n")
            .expect("parse");
    assert_eq!(config.keys.path, Path::new("/tmp/feasted/keys.json"));
}

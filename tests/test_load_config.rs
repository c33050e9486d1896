use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

use biblib_copy::config::DEFAULT_API_URL;
use biblib_copy::load_config::load_config;

/// A fully specified config file needs nothing from the environment.
#[test]
#[serial]
fn load_config_reads_all_fields_from_file() {
    let config_yaml = r#"
api_url: "https://api.example.org/v1/biblib/"
api_token: "file-token"
library_id: "abc123"
library_name: "My Copy"
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::remove_var("ADS_API_TOKEN");
    let config = load_config(config_file.path()).expect("Config should load");

    // Trailing slash on api_url is normalized away.
    assert_eq!(config.api_url, "https://api.example.org/v1/biblib");
    assert_eq!(config.api_token, "file-token");
    assert_eq!(config.library_id, "abc123");
    assert_eq!(config.library_name.as_deref(), Some("My Copy"));
}

/// Minimal config: api_url defaults, token comes from the environment.
#[test]
#[serial]
fn load_config_defaults_url_and_takes_token_from_env() {
    let config_yaml = r#"
library_id: "abc123"
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("ADS_API_TOKEN", "env-token");
    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.api_token, "env-token");
    assert!(config.library_name.is_none());
}

#[test]
#[serial]
fn load_config_errors_when_token_is_missing_everywhere() {
    let config_yaml = r#"
library_id: "abc123"
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::remove_var("ADS_API_TOKEN");
    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();

    assert!(
        msg.contains("ADS_API_TOKEN") || msg.contains("api_token"),
        "Must error for missing token, got: {msg}"
    );
}

#[test]
#[serial]
fn load_config_errors_for_invalid_yaml() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    env::set_var("ADS_API_TOKEN", "present-but-unused");
    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();

    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn load_config_errors_for_missing_file() {
    let err = load_config("/definitely/not/here/config.yml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

//! Config file resolution and graceful degradation tests
//!
//! Tests that touch `TUNESYNC_CONFIG` are marked `#[serial]` so they do not
//! race on the process environment.

use serial_test::serial;
use std::env;
use std::path::Path;
use tempfile::TempDir;
use tunesync_common::config::{load_config, resolve_config_path, TomlConfig, CONFIG_ENV_VAR};
use tunesync_common::Error;

#[test]
#[serial]
fn test_cli_argument_wins_over_environment() {
    env::set_var(CONFIG_ENV_VAR, "/from/env.toml");

    let resolved = resolve_config_path(Some(Path::new("/from/cli.toml")));
    assert_eq!(resolved.as_deref(), Some(Path::new("/from/cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_environment_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/from/env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved.as_deref(), Some(Path::new("/from/env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_no_file_gives_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = load_config(Some(&temp_dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_loads_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
server_url = "http://nas:8080/apps/music/api"
batch_size = 8

[logging]
level = "warn"
file = "/var/log/tunesync.log"
"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.server_url, "http://nas:8080/apps/music/api");
    assert_eq!(config.batch_size, 8);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.logging.file.as_deref(),
        Some(Path::new("/var/log/tunesync.log"))
    );
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "batch_size = \"ten\"").unwrap();

    let result = load_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_oversized_batch_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "batch_size = 25").unwrap();

    let result = load_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
user_id = "bob"
database_path = "/srv/music/library.db"
"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

//! Integration tests for configuration resolution
//!
//! Covers the tier priority (CLI argument, environment variable, TOML
//! file, compiled default) and the graceful degradation rules: missing
//! or malformed configuration never prevents startup.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate BURROW_* variables are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use burrow_common::config::{ServiceConfig, TomlConfig, DATABASE_FILE, DEFAULT_PORT};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn clear_burrow_env() {
    env::remove_var("BURROW_ROOT");
    env::remove_var("BURROW_PORT");
    env::remove_var("BURROW_UPLOAD_KEY");
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_burrow_env();

    let config = ServiceConfig::resolve_with(None, None, None, &TomlConfig::default());

    assert!(!config.root_folder.as_os_str().is_empty());
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.upload_key, None);
    assert!(config.persons.is_empty());
}

#[test]
#[serial]
fn test_cli_argument_takes_precedence() {
    clear_burrow_env();
    env::set_var("BURROW_ROOT", "/tmp/burrow-env-root");

    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/burrow-toml-root")),
        port: Some(9999),
        upload_key: Some("toml-key".to_string()),
        persons: None,
    };

    let config = ServiceConfig::resolve_with(
        Some(Path::new("/tmp/burrow-cli-root")),
        Some(4242),
        Some("cli-key"),
        &toml_config,
    );

    assert_eq!(config.root_folder, PathBuf::from("/tmp/burrow-cli-root"));
    assert_eq!(config.port, 4242);
    assert_eq!(config.upload_key, Some("cli-key".to_string()));

    clear_burrow_env();
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    clear_burrow_env();
    env::set_var("BURROW_ROOT", "/tmp/burrow-env-root");
    env::set_var("BURROW_PORT", "6123");
    env::set_var("BURROW_UPLOAD_KEY", "env-key");

    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/burrow-toml-root")),
        port: Some(9999),
        upload_key: Some("toml-key".to_string()),
        persons: None,
    };

    let config = ServiceConfig::resolve_with(None, None, None, &toml_config);

    assert_eq!(config.root_folder, PathBuf::from("/tmp/burrow-env-root"));
    assert_eq!(config.port, 6123);
    assert_eq!(config.upload_key, Some("env-key".to_string()));

    clear_burrow_env();
}

#[test]
#[serial]
fn test_toml_used_when_no_cli_or_env() {
    clear_burrow_env();

    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/burrow-toml-root")),
        port: Some(9999),
        upload_key: Some("toml-key".to_string()),
        persons: None,
    };

    let config = ServiceConfig::resolve_with(None, None, None, &toml_config);

    assert_eq!(config.root_folder, PathBuf::from("/tmp/burrow-toml-root"));
    assert_eq!(config.port, 9999);
    assert_eq!(config.upload_key, Some("toml-key".to_string()));
}

#[test]
#[serial]
fn test_unparseable_port_env_falls_through() {
    clear_burrow_env();
    env::set_var("BURROW_PORT", "not-a-port");

    let config = ServiceConfig::resolve_with(None, None, None, &TomlConfig::default());
    assert_eq!(config.port, DEFAULT_PORT);

    clear_burrow_env();
}

#[test]
#[serial]
fn test_empty_upload_key_env_does_not_mask_toml_key() {
    clear_burrow_env();
    env::set_var("BURROW_UPLOAD_KEY", "");

    let toml_config = TomlConfig {
        root_folder: None,
        port: None,
        upload_key: Some("toml-key".to_string()),
        persons: None,
    };

    let config = ServiceConfig::resolve_with(None, None, None, &toml_config);
    assert_eq!(config.upload_key, Some("toml-key".to_string()));

    clear_burrow_env();
}

#[test]
#[serial]
fn test_no_upload_key_anywhere_disables_gating() {
    clear_burrow_env();

    let config = ServiceConfig::resolve_with(None, None, None, &TomlConfig::default());
    assert_eq!(config.upload_key, None);
}

#[test]
fn test_database_path_inside_root() {
    let config = ServiceConfig {
        root_folder: PathBuf::from("/tmp/burrow-data"),
        port: DEFAULT_PORT,
        upload_key: None,
        persons: vec![],
    };

    assert_eq!(
        config.database_path(),
        PathBuf::from("/tmp/burrow-data").join(DATABASE_FILE)
    );
}

#[test]
fn test_ensure_root_folder_creates_nested_directories() {
    let test_dir = format!("/tmp/burrow-test-nested-{}/level1/level2", std::process::id());
    let root = PathBuf::from(&test_dir);
    let _ = std::fs::remove_dir_all(&root);

    let config = ServiceConfig {
        root_folder: root.clone(),
        port: DEFAULT_PORT,
        upload_key: None,
        persons: vec![],
    };

    let result = config.ensure_root_folder();
    assert!(result.is_ok(), "Failed to create directory: {:?}", result.err());
    assert!(root.is_dir());

    // Idempotent
    assert!(config.ensure_root_folder().is_ok());

    let _ = std::fs::remove_dir_all(PathBuf::from(format!(
        "/tmp/burrow-test-nested-{}",
        std::process::id()
    )));
}

#[test]
fn test_missing_toml_file_degrades_to_defaults() {
    let config = TomlConfig::load_from(Path::new("/tmp/burrow-definitely-missing-98347.toml"));

    assert_eq!(config.root_folder, None);
    assert_eq!(config.port, None);
    assert_eq!(config.upload_key, None);
}

#[test]
fn test_malformed_toml_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = [this is not toml").unwrap();

    let config = TomlConfig::load_from(&path);
    assert_eq!(config.root_folder, None);
}

#[test]
fn test_toml_file_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        root_folder = "/srv/burrow"
        port = 8123
        upload_key = "family-secret"
        persons = ["mira", "jasper"]
        "#,
    )
    .unwrap();

    let config = TomlConfig::load_from(&path);
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/burrow")));
    assert_eq!(config.port, Some(8123));
    assert_eq!(config.upload_key, Some("family-secret".to_string()));
    assert_eq!(
        config.persons,
        Some(vec!["mira".to_string(), "jasper".to_string()])
    );
}

#[test]
fn test_partial_toml_leaves_rest_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 8123\n").unwrap();

    let config = TomlConfig::load_from(&path);
    assert_eq!(config.root_folder, None);
    assert_eq!(config.port, Some(8123));
    assert_eq!(config.upload_key, None);
    assert_eq!(config.persons, None);
}

//! Tests for loading the configuration.

use rust_decimal_macros::dec;
use serial_test::serial;
use tempfile::tempdir;
use wallet_cli::config::{API_ENV_VAR, DEFAULT_ENDPOINT};
use wallet_cli::WalletConfig;

/// Tests that a saved configuration loads back with the environment applied on top.
#[test]
#[serial]
fn test_file_then_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = WalletConfig {
        base_reserve: dec!(10),
        endpoint: "http://file.example:51234/".to_string(),
        poll_timeout_secs: Some(30),
        ..Default::default()
    };
    config.to_file(&path).unwrap();

    std::env::remove_var(API_ENV_VAR);
    let loaded = WalletConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(loaded, config);

    std::env::set_var(API_ENV_VAR, "http://env.example:51234/");
    let loaded = WalletConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(loaded.endpoint, "http://env.example:51234/");
    assert_eq!(loaded.base_reserve, dec!(10));
    std::env::remove_var(API_ENV_VAR);
}

/// Tests that an empty environment variable is ignored.
#[test]
#[serial]
fn test_blank_environment_is_ignored() {
    std::env::set_var(API_ENV_VAR, "  ");
    let mut config = WalletConfig::default();
    config.apply_env();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    std::env::remove_var(API_ENV_VAR);
}

/// Tests that an explicit configuration path must exist.
#[test]
#[serial]
fn test_missing_explicit_file_fails() {
    let dir = tempdir().unwrap();
    assert!(WalletConfig::load(Some(dir.path().join("absent.json").as_path())).is_err());
}

/// Tests that a malformed file is rejected.
#[test]
#[serial]
fn test_malformed_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(WalletConfig::from_file(&path).is_err());
}

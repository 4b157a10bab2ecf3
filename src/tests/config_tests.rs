//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use super::test_utils::TestFixture;
use crate::config::{
    bubble::BubbleConfig, index::IndexConfig, ConfigLoader, LogConfig, PokesayConfig, Validate,
};
use crate::error::config::ConfigError;
use std::path::PathBuf;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = PokesayConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.bubble.width, 80);
    assert_eq!(config.bubble.tab_width, 4);
    assert_eq!(config.index.path, PathBuf::from("build/pokedex.bin"));
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = PokesayConfig::default();

    config.bubble.width = 0;
    assert!(config.validate().is_err());

    config.bubble.width = 40;
    config.index.compression_level = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));

    config.index.compression_level = 3;
    config.log.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config_file_test.toml",
            r#"
    [bubble]
    width = 40
    no_wrap = true

    [index]
    path = "/opt/pokesay/pokedex.bin"
    "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.bubble.width, 40);
    assert!(config.bubble.no_wrap);
    assert_eq!(config.index.path, PathBuf::from("/opt/pokesay/pokedex.bin"));

    // Other values should be defaults
    assert_eq!(config.bubble.tab_width, 4);
    assert_eq!(config.index.art_extension, "cow");
    assert_eq!(config.log, LogConfig::default());
}

/// Test loading a JSON configuration file.
#[test]
fn test_load_json_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file("config.json", r#"{ "log": { "level": "info", "json": true } }"#)
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_JSON")
        .load()
        .unwrap();
    assert_eq!(config.log.level, "info");
    assert!(config.log.json);
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "config_env_test.toml",
            r#"
    [bubble]
    width = 40
    "#,
        )
        .unwrap();

    fixture.set_env("TEST_ENV__BUBBLE__WIDTH", "120");
    fixture.set_env("TEST_ENV__INDEX__ART_EXTENSION", "txt");

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ENV");
    let config = loader.load().unwrap();

    // Environment variables take precedence over the file
    assert_eq!(config.bubble.width, 120);
    assert_eq!(config.index.art_extension, "txt");
}

/// Test that a missing file and an unknown extension are reported.
#[test]
fn test_load_missing_or_unsupported_file() {
    let fixture = TestFixture::new().unwrap();

    let missing = fixture.temp_dir.path().join("missing.toml");
    let loader = ConfigLoader::new(Some(&missing), "TEST_MISSING");
    assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));

    let ini = fixture.create_file("config.ini", "width=3").unwrap();
    let loader = ConfigLoader::new(Some(&ini), "TEST_INI");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .create_file(
            "invalid.toml",
            r#"
    [bubble
    width = forty"
    "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(loader.load().is_err());
}

/// Test that validation fails for various invalid section values.
#[test]
fn test_specific_validation_rules() {
    let mut bubble = BubbleConfig::default();
    bubble.tab_width = 64;
    assert!(bubble.validate().is_err());

    let mut index = IndexConfig::default();
    index.art_extension = ".cow".to_string();
    assert!(index.validate().is_err());

    let mut index = IndexConfig::default();
    index.max_index_bytes = 0;
    assert!(index.validate().is_err());

    let mut index = IndexConfig::default();
    index.path = PathBuf::new();
    assert!(index.validate().is_err());
}

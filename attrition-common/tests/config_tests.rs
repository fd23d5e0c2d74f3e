//! Integration tests for configuration loading and artifact resolution
//!
//! Tests cover:
//! - Explicit config file must exist
//! - TOML values are read from disk
//! - Artifacts are looked up in the configured directory, then its parent

use attrition_common::config::{resolve_artifact, TomlConfig};
use attrition_common::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_explicit_missing_config_file_is_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.toml");

    let err = TomlConfig::load(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_load_reads_file_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("attrition.toml");
    fs::write(
        &path,
        "host = \"127.0.0.1\"\nport = 8100\nmodel_file = \"lr.json\"\ncors_origins = [\"http://example.test\"]\n",
    )
    .unwrap();

    let config = TomlConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8100);
    assert_eq!(config.model_file, "lr.json");
    assert_eq!(config.cors_origins, vec!["http://example.test".to_string()]);
    assert_eq!(config.preprocessor_file, "preprocessor.json");
}

#[test]
fn test_artifact_found_in_primary_directory() {
    let temp = TempDir::new().unwrap();
    let backend = temp.path().join("backend");
    fs::create_dir(&backend).unwrap();
    fs::write(backend.join("preprocessor.json"), "{}").unwrap();
    fs::write(temp.path().join("preprocessor.json"), "{}").unwrap();

    let mut config = TomlConfig::default();
    config.apply_overrides(None, None, Some(backend.clone()));

    assert_eq!(config.preprocessor_path().unwrap(), backend.join("preprocessor.json"));
}

#[test]
fn test_artifact_falls_back_to_parent_directory() {
    let temp = TempDir::new().unwrap();
    let backend = temp.path().join("backend");
    fs::create_dir(&backend).unwrap();
    fs::write(temp.path().join("best_attrition_model.json"), "{}").unwrap();

    let mut config = TomlConfig::default();
    config.apply_overrides(None, None, Some(backend));

    assert_eq!(
        config.model_path().unwrap(),
        temp.path().join("best_attrition_model.json")
    );
}

#[test]
fn test_artifact_missing_everywhere_names_last_path() {
    let temp = TempDir::new().unwrap();
    let candidates = vec![temp.path().join("backend"), temp.path().to_path_buf()];

    let err = resolve_artifact(&candidates, "model.json").unwrap_err();
    match err {
        Error::Artifact(msg) => {
            assert!(msg.contains("model.json"));
            assert!(msg.contains(&temp.path().display().to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

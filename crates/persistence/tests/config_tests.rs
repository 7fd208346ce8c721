//! Configuration loading tests.

#![cfg(all(feature = "elasticsearch", feature = "cassandra"))]

use std::io::Write;

use tempfile::NamedTempFile;
use tessera_persistence::{BackendError, PersistenceConfig, StorageError};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Test loading a configuration file with several sections.
#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"{
            "elasticsearch": {"index_prefix": "app", "default_size": 50},
            "cassandra": {"keyspace": "app", "allow_filtering": true}
        }"#,
    );

    let config = PersistenceConfig::load(file.path()).unwrap();
    assert_eq!(config.elasticsearch.index_prefix, "app");
    assert_eq!(config.elasticsearch.default_size, 50);
    assert_eq!(config.elasticsearch.max_result_window, 10_000);
    assert_eq!(config.cassandra.keyspace.as_deref(), Some("app"));
    assert!(config.cassandra.allow_filtering);
}

/// Test that a missing file is an I/O error.
#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PersistenceConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, StorageError::Backend(BackendError::Internal { .. })));
}

/// Test that loading validates every section.
#[test]
fn test_load_validates() {
    let file = write_config(r#"{"elasticsearch": {"default_size": 20000}}"#);

    let err = PersistenceConfig::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::InvalidConfiguration { ref backend_name, .. })
            if backend_name == "elasticsearch"
    ));
}

/// Test that malformed JSON is a serialization error.
#[test]
fn test_load_malformed() {
    let file = write_config("{ not json");

    let err = PersistenceConfig::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::SerializationError { .. })
    ));
}

//! Configuration loading tests: JSON parsing, defaults, environment
//! credential overrides and the command-line documents override.

use std::fs::write;

use doc_transport::load_config::{apply_documents_override, load_config};
use serial_test::serial;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = r#"{
  "clientId": "client-123",
  "clientSecret": "secret-456",
  "refreshToken": "refresh-789",
  "marketplace": "US",
  "continuous": true,
  "continuousIntervalSeconds": 300,
  "documents": [
    {
      "downloadFolder": "/data/reports",
      "downloadFileName": "orders.txt",
      "downloadType": "GET_FLAT_FILE_ACTIONABLE_ORDER_DATA_SHIPPING",
      "startOffsetDays": 7,
      "endOffsetDays": 1,
      "containsPii": true,
      "appendTimestamp": true
    },
    {
      "uploadFolder": "/data/feeds",
      "uploadCompletedFolder": "/data/feeds/completed",
      "uploadFailedFolder": "/data/feeds/failed",
      "uploadType": "POST_FLAT_FILE_FULFILLMENT_DATA"
    }
  ]
}"#;

#[test]
#[serial]
fn loads_full_config() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), FULL_CONFIG).unwrap();

    let config = load_config(file.path()).expect("config should load");

    assert_eq!(config.credentials.client_id, "client-123");
    assert_eq!(config.credentials.marketplace, "US");
    assert!(config.continuous);
    assert_eq!(config.continuous_interval_seconds, 300);
    assert_eq!(config.documents.len(), 2);

    let download = &config.documents[0];
    assert_eq!(
        download.download_type.as_deref(),
        Some("GET_FLAT_FILE_ACTIONABLE_ORDER_DATA_SHIPPING")
    );
    assert_eq!(download.start_offset_days, 7);
    assert_eq!(download.end_offset_days, 1);
    assert!(download.contains_pii);
    assert!(download.append_timestamp);
    assert!(download.upload_type.is_none());

    let upload = &config.documents[1];
    assert_eq!(
        upload.upload_type.as_deref(),
        Some("POST_FLAT_FILE_FULFILLMENT_DATA")
    );
    assert_eq!(
        upload.upload_completed_folder.to_string_lossy(),
        "/data/feeds/completed"
    );
}

#[test]
#[serial]
fn missing_fields_take_defaults() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), r#"{ "clientId": "c" }"#).unwrap();

    let config = load_config(file.path()).expect("minimal config should load");

    assert!(!config.continuous);
    assert_eq!(config.continuous_interval_seconds, 0);
    assert!(config.documents.is_empty());
}

#[test]
#[serial]
fn invalid_json_is_a_parse_error() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), b"{ not json :::").unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert!(
        err.to_string().contains("parse"),
        "parse error expected, got: {err}"
    );
}

#[test]
#[serial]
fn unreadable_file_is_a_read_error() {
    let err = load_config("/definitely/not/a/real/Config.json").unwrap_err();
    assert!(
        err.to_string().contains("read"),
        "read error expected, got: {err}"
    );
}

#[test]
#[serial]
fn environment_overrides_credentials() {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), FULL_CONFIG).unwrap();

    std::env::set_var("DOC_TRANSPORT_CLIENT_ID", "env-client");
    std::env::set_var("DOC_TRANSPORT_CLIENT_SECRET", "");
    let config = load_config(file.path()).expect("config should load");
    std::env::remove_var("DOC_TRANSPORT_CLIENT_ID");
    std::env::remove_var("DOC_TRANSPORT_CLIENT_SECRET");

    assert_eq!(config.credentials.client_id, "env-client");
    // Empty override is ignored, file value kept.
    assert_eq!(config.credentials.client_secret, "secret-456");
}

#[test]
#[serial]
fn documents_override_replaces_list_and_forces_one_shot() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), FULL_CONFIG).unwrap();
    let mut config = load_config(config_file.path()).expect("config should load");
    assert!(config.continuous);

    let documents_file = NamedTempFile::new().expect("temp file");
    write(
        documents_file.path(),
        r#"[
          {
            "downloadFolder": "/alt/reports",
            "downloadFileName": "returns.txt",
            "downloadType": "GET_FLAT_FILE_RETURNS_DATA_BY_RETURN_DATE"
          }
        ]"#,
    )
    .unwrap();

    apply_documents_override(&mut config, documents_file.path())
        .expect("override should apply");

    assert!(!config.continuous, "override must force a single cycle");
    assert_eq!(config.documents.len(), 1);
    assert_eq!(
        config.documents[0].download_type.as_deref(),
        Some("GET_FLAT_FILE_RETURNS_DATA_BY_RETURN_DATE")
    );
}

#[test]
#[serial]
fn malformed_documents_override_is_an_error() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), FULL_CONFIG).unwrap();
    let mut config = load_config(config_file.path()).expect("config should load");

    let documents_file = NamedTempFile::new().expect("temp file");
    write(documents_file.path(), b"{ not a list }").unwrap();

    let err = apply_documents_override(&mut config, documents_file.path()).unwrap_err();
    assert!(
        err.to_string().contains("documents"),
        "documents error expected, got: {err}"
    );
}

//! End-to-end CLI tests against the built binary. No network: the happy-path
//! config carries an empty document list, so no gateway call is made.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::NamedTempFile;

fn empty_documents_config() -> NamedTempFile {
    let config = NamedTempFile::new().expect("creating temp config file failed");
    write(
        config.path(),
        br#"{
          "clientId": "client",
          "clientSecret": "secret",
          "refreshToken": "token",
          "marketplace": "US",
          "continuous": false,
          "documents": []
        }"#,
    )
    .expect("writing temp config failed");
    config
}

#[test]
fn run_with_empty_document_list_exits_zero() {
    let config = empty_documents_config();
    let mut cmd = Command::cargo_bin("doc-transport").expect("binary exists");

    cmd.arg("run").arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Processing complete"));
}

#[test]
fn missing_config_file_exits_nonzero_before_any_transfer() {
    let mut cmd = Command::cargo_bin("doc-transport").expect("binary exists");

    cmd.arg("run").arg("--config").arg("/no/such/Config.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn malformed_config_file_exits_nonzero() {
    let config = NamedTempFile::new().expect("creating temp config file failed");
    write(config.path(), b"definitely not json").expect("writing temp config failed");
    let mut cmd = Command::cargo_bin("doc-transport").expect("binary exists");

    cmd.arg("run").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn documents_override_flag_is_accepted() {
    let config = empty_documents_config();
    let documents = NamedTempFile::new().expect("creating temp documents file failed");
    write(documents.path(), b"[]").expect("writing temp documents failed");
    let mut cmd = Command::cargo_bin("doc-transport").expect("binary exists");

    cmd.arg("run")
        .arg("--config")
        .arg(config.path())
        .arg("--documents")
        .arg(documents.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Processing complete"));
}

//! Run configuration types, deserialized once at startup and immutable after.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level run configuration, the shape of `Config.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub continuous: bool,
    #[serde(default)]
    pub continuous_interval_seconds: u64,
    #[serde(default)]
    pub documents: Vec<DocumentEntry>,
}

impl RunConfig {
    pub fn trace_loaded(&self) {
        info!(
            continuous = self.continuous,
            interval_seconds = self.continuous_interval_seconds,
            documents = self.documents.len(),
            "Loaded run configuration"
        );
        debug!(?self, "Run configuration (full debug)");
    }
}

/// Opaque auth bundle, consumed only by the gateway implementation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub marketplace: String,
    #[serde(default)]
    pub role_arn: Option<String>,
}

/// One configured document: a report to download and/or a feed folder to upload.
///
/// At least one of `download_type`/`upload_type` must be set for the entry to
/// do useful work; an entry with neither is a no-op, not an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    #[serde(default)]
    pub download_folder: PathBuf,
    #[serde(default)]
    pub upload_folder: PathBuf,
    #[serde(default)]
    pub upload_completed_folder: PathBuf,
    #[serde(default)]
    pub upload_failed_folder: PathBuf,
    #[serde(default)]
    pub download_file_name: String,
    #[serde(default)]
    pub download_type: Option<String>,
    #[serde(default)]
    pub upload_type: Option<String>,
    #[serde(default)]
    pub start_offset_days: i64,
    #[serde(default)]
    pub end_offset_days: i64,
    #[serde(default)]
    pub contains_pii: bool,
    #[serde(default)]
    pub append_timestamp: bool,
}

impl DocumentEntry {
    pub fn trace_loaded(&self) {
        info!(
            download_type = self.download_type.as_deref().unwrap_or("-"),
            upload_type = self.upload_type.as_deref().unwrap_or("-"),
            "Loaded document entry"
        );
    }
}

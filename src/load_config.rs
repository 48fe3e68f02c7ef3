//! Loads the JSON run configuration and the optional command-line documents
//! override. A malformed or unreadable configuration is fatal: the caller
//! logs and exits before any transfer is attempted.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::{DocumentEntry, RunConfig};

/// Load `Config.json` from the given path and apply credential overrides from
/// the environment (loaded via dotenv by the binary before this runs).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    let mut config: RunConfig = serde_json::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config JSON");
        anyhow::anyhow!("Failed to parse config JSON: {e}")
    })?;

    apply_env_overrides(&mut config);

    config.trace_loaded();
    for entry in &config.documents {
        entry.trace_loaded();
    }

    Ok(config)
}

/// Replace the configured document list wholesale with the contents of a
/// documents JSON file given on the command line, and force one-shot mode.
/// This lets one installed binary serve multiple disparate schedules without
/// copies of the whole configuration.
pub fn apply_documents_override<P: AsRef<Path>>(config: &mut RunConfig, path: P) -> Result<()> {
    let path_ref = path.as_ref();
    info!(documents_path = ?path_ref, "Loading command-line documents file");

    let content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read documents file {:?}", path_ref))?;
    let documents: Vec<DocumentEntry> = serde_json::from_str(&content).map_err(|e| {
        error!(error = ?e, documents_path = ?path_ref, "Failed to parse documents JSON");
        anyhow::anyhow!("Failed to parse documents JSON: {e}")
    })?;

    info!(documents = documents.len(), "Documents override applied; continuous mode disabled");
    config.documents = documents;
    config.continuous = false;
    Ok(())
}

/// Credentials may be supplied per environment instead of the config file,
/// keeping secrets out of scheduled-task working directories.
fn apply_env_overrides(config: &mut RunConfig) {
    let overrides = [
        ("DOC_TRANSPORT_CLIENT_ID", &mut config.credentials.client_id),
        (
            "DOC_TRANSPORT_CLIENT_SECRET",
            &mut config.credentials.client_secret,
        ),
        (
            "DOC_TRANSPORT_REFRESH_TOKEN",
            &mut config.credentials.refresh_token,
        ),
    ];
    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var) {
            if value.is_empty() {
                warn!(var, "Ignoring empty credential override from environment");
            } else {
                info!(var, "Credential override taken from environment");
                *slot = value;
            }
        }
    }
}

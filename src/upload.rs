//! Feed upload path of the transfer executor.
//!
//! One call scans the entry's upload folder once and submits every file it
//! finds as the configured feed type, then waits for the platform's verdict.
//!
//! Completion policy: after submission the job is polled at a fixed interval
//! until it leaves `Pending`/`InProgress`, bounded by `max_attempts`. `Done`
//! routes the file to the completed folder, `Failed` to the failed folder.
//! When the poll budget runs out while the feed is still processing, the
//! acknowledged submission counts as accepted and the file goes to the
//! completed folder: large feeds can take arbitrarily long remotely and the
//! job handle is the durable receipt. Either way every attempted file leaves
//! the upload folder, which is what prevents resubmission next cycle.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};

use crate::config::DocumentEntry;
use crate::error::{TransferError, TransferOutcome};
use crate::files;
use crate::gateway::{FeedStatus, JobHandle, TransferGateway};
use crate::registry::{self, Direction, FeedType, OperationKind};
use crate::timing::Sleeper;

/// How submitted feed jobs are polled to resolution.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            interval: Duration::from_secs(30),
            max_attempts: 20,
        }
    }
}

/// One in-flight remote feed job. Lives only inside [`upload_feed`]: created
/// when a submission succeeds, dropped once the file is relocated.
struct TransferJob {
    handle: JobHandle,
    status: FeedStatus,
    source: PathBuf,
}

/// Where a fully resolved file belongs.
enum Resolution {
    Completed,
    Failed,
}

/// Upload every file currently in the entry's upload folder.
///
/// Files are processed sequentially in name order; one file's failure routes
/// that file to the failed folder and does not block the others. The entry
/// outcome is `Success` only if every scanned file was relocated cleanly.
pub async fn upload_feed<G, S>(
    gateway: &G,
    sleeper: &S,
    policy: &PollPolicy,
    entry: &DocumentEntry,
) -> TransferOutcome
where
    G: TransferGateway,
    S: Sleeper,
{
    let code = entry.upload_type.as_deref().unwrap_or_default();
    let feed_type = match registry::resolve(code, Direction::Upload) {
        Some(OperationKind::UploadFeed(t)) => t,
        _ => {
            error!(document_type = code, "Unsupported upload document type");
            return TransferError::UnsupportedDocumentType(code.to_string()).into();
        }
    };

    if !entry.upload_folder.is_dir() {
        error!(
            document_type = code,
            folder = %entry.upload_folder.display(),
            "Upload documents folder does not exist"
        );
        return TransferError::MissingUploadFolder(entry.upload_folder.clone()).into();
    }

    // One snapshot; files added mid-scan wait for the next cycle.
    let files = match scan_folder(entry) {
        Ok(files) => files,
        Err(e) => return TransferOutcome::Failure(e),
    };
    info!(
        document_type = code,
        files = files.len(),
        folder = %entry.upload_folder.display(),
        "Scanned upload documents folder"
    );

    let mut first_error: Option<TransferError> = None;
    for file in files {
        let resolution = submit_and_resolve(gateway, sleeper, policy, feed_type, &file).await;
        let target_folder = match resolution {
            Ok(Resolution::Completed) => &entry.upload_completed_folder,
            Ok(Resolution::Failed) => &entry.upload_failed_folder,
            Err(e) => {
                first_error.get_or_insert(e);
                &entry.upload_failed_folder
            }
        };

        // Relocation is the commit point; a move failure leaves the file in
        // place and marks the entry failed so the operator sees it.
        match files::move_into_folder(&file, target_folder, Local::now()) {
            Ok(dest) => {
                info!(
                    document_type = code,
                    file = %file.display(),
                    destination = %dest.display(),
                    "Relocated feed file"
                );
            }
            Err(e) => {
                error!(
                    document_type = code,
                    file = %file.display(),
                    error = %e,
                    "Failed to relocate feed file"
                );
                first_error.get_or_insert(TransferError::filesystem(file.clone(), e));
            }
        }
    }

    match first_error {
        None => TransferOutcome::Success,
        Some(e) => TransferOutcome::Failure(e),
    }
}

/// Submit one file and poll its job to resolution. The returned error means
/// the gateway failed outright; the caller still relocates the file.
async fn submit_and_resolve<G, S>(
    gateway: &G,
    sleeper: &S,
    policy: &PollPolicy,
    feed_type: FeedType,
    file: &Path,
) -> Result<Resolution, TransferError>
where
    G: TransferGateway,
    S: Sleeper,
{
    info!(file = %file.display(), feed_type = feed_type.code(), "Submitting feed file");
    let handle = gateway
        .submit_feed(file, feed_type)
        .await
        .map_err(|e| {
            error!(file = %file.display(), error = %e, "Feed submission failed");
            TransferError::Gateway(e)
        })?;

    let mut job = TransferJob {
        handle,
        status: FeedStatus::Pending,
        source: file.to_path_buf(),
    };

    for _ in 0..policy.max_attempts {
        sleeper.sleep(policy.interval).await;
        job.status = gateway.feed_status(&job.handle).await.map_err(|e| {
            error!(
                file = %job.source.display(),
                feed_id = %job.handle,
                error = %e,
                "Feed status poll failed"
            );
            TransferError::Gateway(e)
        })?;
        info!(
            file = %job.source.display(),
            feed_id = %job.handle,
            status = ?job.status,
            "Polled feed status"
        );
        if job.status.is_terminal() {
            break;
        }
    }

    match job.status {
        FeedStatus::Done => Ok(Resolution::Completed),
        FeedStatus::Failed => {
            warn!(
                file = %job.source.display(),
                feed_id = %job.handle,
                "Feed processing failed remotely"
            );
            Ok(Resolution::Failed)
        }
        FeedStatus::Pending | FeedStatus::InProgress => {
            // Poll budget exhausted; the submission is acknowledged and keeps
            // processing remotely, so the file counts as accepted.
            info!(
                file = %job.source.display(),
                feed_id = %job.handle,
                "Feed still processing after poll budget; accepting submission"
            );
            Ok(Resolution::Completed)
        }
    }
}

fn scan_folder(entry: &DocumentEntry) -> Result<Vec<PathBuf>, TransferError> {
    let read = std::fs::read_dir(&entry.upload_folder)
        .map_err(|e| TransferError::filesystem(entry.upload_folder.clone(), e))?;
    let mut files = Vec::new();
    for dir_entry in read {
        let dir_entry =
            dir_entry.map_err(|e| TransferError::filesystem(entry.upload_folder.clone(), e))?;
        let path = dir_entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

//! Report download path of the transfer executor.
//!
//! One call handles one document entry: resolve the configured report code,
//! ask the gateway to generate and fetch the report over the computed
//! window, then move the transient artifact to its configured destination.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Local, Utc};
use tracing::{error, info};

use crate::config::DocumentEntry;
use crate::error::{TransferError, TransferOutcome};
use crate::files;
use crate::gateway::{ReportWindow, TransferGateway};
use crate::registry::{self, Direction, OperationKind};

/// Days of lookback when an entry leaves the start offset unset.
const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Compute the report window for an entry. Offsets count days back from
/// `now`; each bound uses its own offset, a zero start offset means the
/// default lookback and a zero end offset means now.
pub fn report_window(now: DateTime<Utc>, entry: &DocumentEntry) -> ReportWindow {
    let start = if entry.start_offset_days != 0 {
        now - Duration::days(entry.start_offset_days.abs())
    } else {
        now - Duration::days(DEFAULT_LOOKBACK_DAYS)
    };
    let end = if entry.end_offset_days != 0 {
        now - Duration::days(entry.end_offset_days.abs())
    } else {
        now
    };
    ReportWindow { start, end }
}

/// Destination path for a downloaded report. With `append_timestamp` the
/// stamped name keeps the configured extension so repeated runs never
/// overwrite each other; without it the configured name is used verbatim.
pub fn destination_path(entry: &DocumentEntry, now: DateTime<Local>) -> PathBuf {
    let file_name = if entry.append_timestamp {
        files::timestamped_download_name(&entry.download_file_name, now)
    } else {
        entry.download_file_name.clone()
    };
    entry.download_folder.join(file_name)
}

/// Download one report for one document entry.
///
/// Never returns an error past this boundary: every failure is folded into
/// the outcome so one entry cannot abort the batch.
pub async fn download_report<G>(gateway: &G, entry: &DocumentEntry) -> TransferOutcome
where
    G: TransferGateway,
{
    let code = entry.download_type.as_deref().unwrap_or_default();
    let report_type = match registry::resolve(code, Direction::Download) {
        Some(OperationKind::DownloadReport(t)) => t,
        _ => {
            error!(document_type = code, "Unsupported download document type");
            return TransferError::UnsupportedDocumentType(code.to_string()).into();
        }
    };

    let window = report_window(Utc::now(), entry);
    info!(
        document_type = code,
        start = %window.start,
        end = %window.end,
        pii = entry.contains_pii,
        "Requesting report generation"
    );

    let transient = match gateway
        .generate_report(report_type, window, entry.contains_pii)
        .await
    {
        Ok(path) => path,
        Err(e) => {
            error!(document_type = code, error = %e, "Report generation failed");
            return TransferError::Gateway(e).into();
        }
    };

    let dest = destination_path(entry, Local::now());
    if let Err(e) = files::move_replacing(&transient, &dest) {
        error!(
            document_type = code,
            destination = %dest.display(),
            error = %e,
            "Failed to place downloaded report"
        );
        return TransferError::filesystem(dest, e).into();
    }

    info!(document_type = code, destination = %dest.display(), "Downloaded report placed");
    TransferOutcome::Success
}

//! Remote transfer gateway contract.
//!
//! One trait, implemented by the real platform client ([`crate::sp_gateway`])
//! and by deterministic mocks in tests. The gateway owns authentication,
//! session handling and its own internal retry/polling for report
//! generation; callers see only the three capabilities below.
//!
//! The trait is annotated for `mockall` so consumers can generate mocks for
//! unit and integration tests (exported under the `test-export-mocks`
//! feature, enabled by default).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::GatewayError;
use crate::registry::{FeedType, ReportType};

/// Opaque job identifier returned by the platform for a submitted feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(pub String);

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote processing state of a submitted feed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

impl FeedStatus {
    /// Whether the platform will not change this status any further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedStatus::Done | FeedStatus::Failed)
    }
}

/// Time window a report is generated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Capabilities of the remote marketplace platform, as consumed by the
/// transfer executor. All methods return boxed errors; the executor maps
/// them to per-entry failures without aborting the batch.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TransferGateway: Send + Sync {
    /// Submit one outbound feed file for asynchronous processing, returning
    /// the job handle to poll.
    async fn submit_feed(
        &self,
        file: &Path,
        feed_type: FeedType,
    ) -> Result<JobHandle, GatewayError>;

    /// Poll the processing status of a previously submitted feed.
    async fn feed_status(&self, handle: &JobHandle) -> Result<FeedStatus, GatewayError>;

    /// Request generation of a report over the given window, wait for the
    /// platform to finish it, and fetch the artifact to a transient local
    /// path the caller is expected to relocate.
    async fn generate_report(
        &self,
        report_type: ReportType,
        window: ReportWindow,
        pii: bool,
    ) -> Result<PathBuf, GatewayError>;
}

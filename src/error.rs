//! Shared result and error types for transfer operations.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by gateway implementations, so implementors stay free
/// in how they surface upstream failures.
pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while processing a single document entry.
///
/// None of these abort the batch; each is isolated to its entry (or file),
/// logged, and recorded in the cycle report. Only configuration load failure
/// is fatal, and that is handled at the CLI boundary before any transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid document type: {0}")]
    UnsupportedDocumentType(String),

    #[error("upload documents folder does not exist: {}", .0.display())]
    MissingUploadFolder(PathBuf),

    #[error("remote gateway error: {0}")]
    Gateway(GatewayError),

    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Per-operation result: one download or one upload of one document entry.
#[derive(Debug)]
pub enum TransferOutcome {
    Success,
    Failure(TransferError),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}

impl From<TransferError> for TransferOutcome {
    fn from(e: TransferError) -> Self {
        TransferOutcome::Failure(e)
    }
}

//! Store error types.

use washi_types::{BlockId, ReportId};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from report/block persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("report not found: {0}")]
    ReportNotFound(ReportId),

    #[error("block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("content serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failure for remote backends.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

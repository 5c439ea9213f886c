//! Persistence for Washi reports and blocks.
//!
//! The document controller in `washi-doc` talks to storage through two
//! narrow async traits, [`ReportStore`] and [`BlockStore`], modeled as a
//! remote row store: every call is independently fallible, writes are
//! whole-row (last write wins), and there is no cross-call transaction.
//!
//! Two backends:
//! - [`MemoryStore`]: DashMap-backed, with change broadcasting. The
//!   default for tests and embedded use.
//! - [`SqliteStore`]: rusqlite with a JSON content column. What the CLI
//!   uses.
//!
//! # Concurrency Model
//!
//! - DashMap for concurrent row access (memory backend)
//! - One connection behind a mutex (SQLite backend)
//! - tokio broadcast for change events

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use washi_types::{Block, BlockContent, BlockId, Report, ReportId, UserId};

/// Events broadcast when stored rows change.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    ReportCreated { report_id: ReportId },
    ReportUpdated { report_id: ReportId },
    ReportDeleted { report_id: ReportId },
    BlockCreated { report_id: ReportId, block_id: BlockId },
    BlockUpdated { report_id: ReportId, block_id: BlockId },
    BlockMoved { report_id: ReportId, block_id: BlockId, position: i64 },
    BlockDeleted { report_id: ReportId, block_id: BlockId },
}

/// Request to create a report. The store assigns id and timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewReport {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: UserId,
}

/// Request to create a block. The store assigns id and metadata, and
/// rejects the call when the report is missing or owned by someone else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewBlock {
    pub report_id: ReportId,
    pub created_by: UserId,
    pub position: i64,
    pub content: BlockContent,
}

/// Report rows: the owned containers blocks hang off.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch one report, `None` when it does not exist.
    async fn get_report(&self, id: ReportId) -> Result<Option<Report>>;

    /// Insert a new report row.
    async fn create_report(&self, new: NewReport) -> Result<Report>;

    /// Replace a report's title and description.
    async fn update_report(
        &self,
        id: ReportId,
        title: String,
        description: Option<String>,
    ) -> Result<Report>;

    /// Delete a report, removing its dependent blocks first.
    async fn delete_report(&self, id: ReportId) -> Result<()>;

    /// All reports created by `user`, oldest first.
    async fn list_reports_for_user(&self, user: UserId) -> Result<Vec<Report>>;
}

/// Block rows. Every write is whole-row: the caller sends the complete
/// new value and the store replaces what was there (last write wins).
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// All blocks of a report in render order: sorted by `(position, id)`.
    async fn list_blocks(&self, report_id: ReportId) -> Result<Vec<Block>>;

    /// Insert a new block row with a store-assigned id. Fails with
    /// `Validation` when the report does not exist and `PermissionDenied`
    /// when the caller is not the report's creator.
    async fn create_block(&self, new: NewBlock) -> Result<Block>;

    /// Replace a block's content. The store bumps `updated_at` and
    /// returns the stored row.
    async fn update_block(&self, id: BlockId, content: BlockContent) -> Result<Block>;

    /// Replace a block's position. One row only; a reorder issues one of
    /// these per moved block.
    async fn update_block_position(&self, id: BlockId, position: i64) -> Result<()>;

    /// Delete one block.
    async fn delete_block(&self, id: BlockId) -> Result<()>;

    /// Delete every block of a report. Used before report deletion.
    async fn delete_report_blocks(&self, report_id: ReportId) -> Result<()>;
}

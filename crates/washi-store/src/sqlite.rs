//! SQLite store backend.
//!
//! Two tables, `reports` and `blocks`, with block content serialized as a
//! JSON column (the `type` tag lives inside the JSON). IDs are stored as
//! 32-char hex; UUIDv7 hex sorts in creation order, so `ORDER BY
//! position, id` gives the same render order as the memory backend.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection};

use washi_types::{
    now_millis, Block, BlockContent, BlockId, BlockMetadata, Report, ReportId, UserId,
};

use crate::error::{Result, StoreError};
use crate::{BlockStore, NewBlock, NewReport, ReportStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reports (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    created_by TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reports_creator ON reports(created_by, created_at);

CREATE TABLE IF NOT EXISTS blocks (
    id TEXT PRIMARY KEY,
    report_id TEXT NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_blocks_report ON blocks(report_id, position, id);
"#;

/// Store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn bad_column<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn report_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Report> {
    let id: String = row.get(0)?;
    let created_by: String = row.get(3)?;
    Ok(Report {
        id: ReportId::parse(&id).map_err(|e| bad_column(0, e))?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_by: UserId::parse(&created_by).map_err(|e| bad_column(3, e))?,
        created_at: row.get::<_, i64>(4)? as u64,
        updated_at: row.get::<_, i64>(5)? as u64,
    })
}

fn block_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    let id: String = row.get(0)?;
    let report_id: String = row.get(1)?;
    let content: String = row.get(3)?;
    Ok(Block {
        id: BlockId::parse(&id).map_err(|e| bad_column(0, e))?,
        report_id: ReportId::parse(&report_id).map_err(|e| bad_column(1, e))?,
        position: row.get(2)?,
        content: serde_json::from_str::<BlockContent>(&content).map_err(|e| bad_column(3, e))?,
        metadata: BlockMetadata {
            created_at: row.get::<_, i64>(4)? as u64,
            updated_at: row.get::<_, i64>(5)? as u64,
        },
    })
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, created_by, created_at, updated_at
             FROM reports WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id.to_hex()])?;
        match rows.next()? {
            Some(row) => Ok(Some(report_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn create_report(&self, new: NewReport) -> Result<Report> {
        let report = Report::new(new.created_by, new.title, new.description);
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO reports (id, title, description, created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.id.to_hex(),
                report.title,
                report.description,
                report.created_by.to_hex(),
                report.created_at as i64,
                report.updated_at as i64,
            ],
        )?;
        Ok(report)
    }

    async fn update_report(
        &self,
        id: ReportId,
        title: String,
        description: Option<String>,
    ) -> Result<Report> {
        {
            let conn = self.conn.lock();
            let changed = conn.execute(
                "UPDATE reports SET title = ?1, description = ?2,
                 updated_at = MAX(updated_at, ?3) WHERE id = ?4",
                params![title, description, now_millis() as i64, id.to_hex()],
            )?;
            if changed == 0 {
                return Err(StoreError::ReportNotFound(id));
            }
        }
        self.get_report(id)
            .await?
            .ok_or(StoreError::ReportNotFound(id))
    }

    async fn delete_report(&self, id: ReportId) -> Result<()> {
        let conn = self.conn.lock();
        // Explicit pre-delete; the FK cascade is belt only.
        conn.execute("DELETE FROM blocks WHERE report_id = ?1", params![id.to_hex()])?;
        let changed = conn.execute("DELETE FROM reports WHERE id = ?1", params![id.to_hex()])?;
        if changed == 0 {
            return Err(StoreError::ReportNotFound(id));
        }
        Ok(())
    }

    async fn list_reports_for_user(&self, user: UserId) -> Result<Vec<Report>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, created_by, created_at, updated_at
             FROM reports WHERE created_by = ?1 ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![user.to_hex()], report_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[async_trait]
impl BlockStore for SqliteStore {
    async fn list_blocks(&self, report_id: ReportId) -> Result<Vec<Block>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, report_id, position, content, created_at, updated_at
             FROM blocks WHERE report_id = ?1 ORDER BY position, id",
        )?;
        let rows = stmt.query_map(params![report_id.to_hex()], block_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn create_block(&self, new: NewBlock) -> Result<Block> {
        let report = self
            .get_report(new.report_id)
            .await?
            .ok_or_else(|| StoreError::Validation(format!("no such report: {}", new.report_id)))?;
        if report.created_by != new.created_by {
            return Err(StoreError::PermissionDenied(format!(
                "report {} is not owned by {}",
                new.report_id, new.created_by
            )));
        }

        let block = Block::new(new.report_id, new.position, new.content);
        let content = serde_json::to_string(&block.content)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO blocks (id, report_id, position, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                block.id.to_hex(),
                block.report_id.to_hex(),
                block.position,
                content,
                block.metadata.created_at as i64,
                block.metadata.updated_at as i64,
            ],
        )?;
        Ok(block)
    }

    async fn update_block(&self, id: BlockId, content: BlockContent) -> Result<Block> {
        let json = serde_json::to_string(&content)?;
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE blocks SET content = ?1, updated_at = MAX(updated_at, ?2) WHERE id = ?3",
            params![json, now_millis() as i64, id.to_hex()],
        )?;
        if changed == 0 {
            return Err(StoreError::BlockNotFound(id));
        }
        let mut stmt = conn.prepare(
            "SELECT id, report_id, position, content, created_at, updated_at
             FROM blocks WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id.to_hex()])?;
        match rows.next()? {
            Some(row) => Ok(block_from_row(row)?),
            None => Err(StoreError::BlockNotFound(id)),
        }
    }

    async fn update_block_position(&self, id: BlockId, position: i64) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE blocks SET position = ?1, updated_at = MAX(updated_at, ?2) WHERE id = ?3",
            params![position, now_millis() as i64, id.to_hex()],
        )?;
        if changed == 0 {
            return Err(StoreError::BlockNotFound(id));
        }
        Ok(())
    }

    async fn delete_block(&self, id: BlockId) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM blocks WHERE id = ?1", params![id.to_hex()])?;
        if changed == 0 {
            return Err(StoreError::BlockNotFound(id));
        }
        Ok(())
    }

    async fn delete_report_blocks(&self, report_id: ReportId) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM blocks WHERE report_id = ?1", params![report_id.to_hex()])?;
        Ok(())
    }
}

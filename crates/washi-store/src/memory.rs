//! In-memory store backend.
//!
//! DashMap rows plus a broadcast channel for change events. Behaves like
//! the SQLite backend in every observable way, so tests against it carry
//! over.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use washi_types::{Block, BlockContent, BlockId, Report, ReportId, UserId};

use crate::error::{Result, StoreError};
use crate::{BlockStore, NewBlock, NewReport, ReportStore, StoreEvent};

/// Concurrent in-memory row store.
pub struct MemoryStore {
    reports: DashMap<ReportId, Report>,
    blocks: DashMap<BlockId, Block>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            reports: DashMap::new(),
            blocks: DashMap::new(),
            event_tx,
        }
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Number of stored blocks across all reports.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn get_report(&self, id: ReportId) -> Result<Option<Report>> {
        Ok(self.reports.get(&id).map(|r| r.clone()))
    }

    async fn create_report(&self, new: NewReport) -> Result<Report> {
        let report = Report::new(new.created_by, new.title, new.description);
        let report_id = report.id;
        self.reports.insert(report_id, report.clone());
        self.emit(StoreEvent::ReportCreated { report_id });
        Ok(report)
    }

    async fn update_report(
        &self,
        id: ReportId,
        title: String,
        description: Option<String>,
    ) -> Result<Report> {
        let updated = {
            let mut entry = self.reports.get_mut(&id).ok_or(StoreError::ReportNotFound(id))?;
            entry.title = title;
            entry.description = description;
            entry.touch();
            entry.clone()
        };
        self.emit(StoreEvent::ReportUpdated { report_id: id });
        Ok(updated)
    }

    async fn delete_report(&self, id: ReportId) -> Result<()> {
        if !self.reports.contains_key(&id) {
            return Err(StoreError::ReportNotFound(id));
        }
        self.delete_report_blocks(id).await?;
        self.reports.remove(&id);
        self.emit(StoreEvent::ReportDeleted { report_id: id });
        Ok(())
    }

    async fn list_reports_for_user(&self, user: UserId) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .iter()
            .filter(|r| r.created_by == user)
            .map(|r| r.clone())
            .collect();
        reports.sort_by_key(|r| (r.created_at, r.id));
        Ok(reports)
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn list_blocks(&self, report_id: ReportId) -> Result<Vec<Block>> {
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| b.report_id == report_id)
            .map(|b| b.clone())
            .collect();
        blocks.sort_by_key(|b| b.sort_key());
        Ok(blocks)
    }

    async fn create_block(&self, new: NewBlock) -> Result<Block> {
        let report = self
            .reports
            .get(&new.report_id)
            .ok_or_else(|| StoreError::Validation(format!("no such report: {}", new.report_id)))?;
        if report.created_by != new.created_by {
            return Err(StoreError::PermissionDenied(format!(
                "report {} is not owned by {}",
                new.report_id, new.created_by
            )));
        }
        drop(report);

        let block = Block::new(new.report_id, new.position, new.content);
        let (report_id, block_id) = (block.report_id, block.id);
        self.blocks.insert(block_id, block.clone());
        self.emit(StoreEvent::BlockCreated { report_id, block_id });
        Ok(block)
    }

    async fn update_block(&self, id: BlockId, content: BlockContent) -> Result<Block> {
        let updated = {
            let mut entry = self.blocks.get_mut(&id).ok_or(StoreError::BlockNotFound(id))?;
            entry.content = content;
            entry.touch();
            entry.clone()
        };
        self.emit(StoreEvent::BlockUpdated {
            report_id: updated.report_id,
            block_id: id,
        });
        Ok(updated)
    }

    async fn update_block_position(&self, id: BlockId, position: i64) -> Result<()> {
        let report_id = {
            let mut entry = self.blocks.get_mut(&id).ok_or(StoreError::BlockNotFound(id))?;
            entry.position = position;
            entry.touch();
            entry.report_id
        };
        self.emit(StoreEvent::BlockMoved {
            report_id,
            block_id: id,
            position,
        });
        Ok(())
    }

    async fn delete_block(&self, id: BlockId) -> Result<()> {
        let (_, block) = self.blocks.remove(&id).ok_or(StoreError::BlockNotFound(id))?;
        self.emit(StoreEvent::BlockDeleted {
            report_id: block.report_id,
            block_id: id,
        });
        Ok(())
    }

    async fn delete_report_blocks(&self, report_id: ReportId) -> Result<()> {
        self.blocks.retain(|_, b| b.report_id != report_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use washi_types::{TextContent, TextStyle};

    async fn seed_report(store: &MemoryStore, user: UserId) -> Report {
        store
            .create_report(NewReport {
                title: "r".to_string(),
                description: None,
                created_by: user,
            })
            .await
            .unwrap()
    }

    fn text_content() -> BlockContent {
        BlockContent::Text(TextContent::empty_paragraph())
    }

    fn new_block(report: &Report, position: i64) -> NewBlock {
        NewBlock {
            report_id: report.id,
            created_by: report.created_by,
            position,
            content: text_content(),
        }
    }

    // ── Reports ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_report_crud() {
        let store = MemoryStore::new();
        let user = UserId::local();

        let report = store
            .create_report(NewReport {
                title: "Q3".to_string(),
                description: Some("numbers".to_string()),
                created_by: user,
            })
            .await
            .unwrap();
        let loaded = store.get_report(report.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Q3");
        assert_eq!(loaded.description.as_deref(), Some("numbers"));

        let renamed = store
            .update_report(report.id, "Q3 Final".to_string(), None)
            .await
            .unwrap();
        assert_eq!(renamed.title, "Q3 Final");
        assert_eq!(renamed.description, None);

        store.delete_report(report.id).await.unwrap();
        assert!(store.get_report(report.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_reports_filters_by_creator() {
        let store = MemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        seed_report(&store, alice).await;
        seed_report(&store, bob).await;
        seed_report(&store, alice).await;

        let mine = store.list_reports_for_user(alice).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.created_by == alice));
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_block_crud() {
        let store = MemoryStore::new();
        let report = seed_report(&store, UserId::local()).await;

        let block = store.create_block(new_block(&report, 1)).await.unwrap();
        let listed = store.list_blocks(report.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, block.id);
        assert_eq!(listed[0].position, 1);

        store.delete_block(block.id).await.unwrap();
        assert!(matches!(
            store.delete_block(block.id).await,
            Err(StoreError::BlockNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_block_validates_report() {
        let store = MemoryStore::new();
        let result = store
            .create_block(NewBlock {
                report_id: ReportId::new(),
                created_by: UserId::local(),
                position: 1,
                content: text_content(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_block_checks_ownership() {
        let store = MemoryStore::new();
        let report = seed_report(&store, UserId::new()).await;

        let result = store
            .create_block(NewBlock {
                report_id: report.id,
                created_by: UserId::new(), // not the creator
                position: 1,
                content: text_content(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_list_blocks_render_order() {
        let store = MemoryStore::new();
        let report = seed_report(&store, UserId::local()).await;

        let b3 = store.create_block(new_block(&report, 3)).await.unwrap();
        let b1 = store.create_block(new_block(&report, 1)).await.unwrap();
        // Same position as b1 but created later: id breaks the tie.
        let b1b = store.create_block(new_block(&report, 1)).await.unwrap();

        let listed = store.list_blocks(report.id).await.unwrap();
        let ids: Vec<BlockId> = listed.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![b1.id, b1b.id, b3.id]);
    }

    #[tokio::test]
    async fn test_delete_report_cascades_to_blocks() {
        let store = MemoryStore::new();
        let report = seed_report(&store, UserId::local()).await;
        let other = seed_report(&store, UserId::local()).await;

        store.create_block(new_block(&report, 1)).await.unwrap();
        store.create_block(new_block(&report, 2)).await.unwrap();
        store.create_block(new_block(&other, 1)).await.unwrap();

        store.delete_report(report.id).await.unwrap();
        assert_eq!(store.block_count(), 1);
        assert_eq!(store.list_blocks(other.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_block_is_whole_row() {
        let store = MemoryStore::new();
        let report = seed_report(&store, UserId::local()).await;
        let block = store.create_block(new_block(&report, 1)).await.unwrap();

        let new_content = BlockContent::Text(TextContent {
            html: "<h1>Title</h1>".to_string(),
            text: "Title".to_string(),
            style: TextStyle::Heading1,
            ..Default::default()
        });
        let updated = store
            .update_block(block.id, new_content.clone())
            .await
            .unwrap();
        assert_eq!(updated.content, new_content);
        assert!(updated.metadata.updated_at >= block.metadata.updated_at);
    }

    // ── Events ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_event_subscription() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        let report = seed_report(&store, UserId::local()).await;
        let block = store.create_block(new_block(&report, 1)).await.unwrap();
        store.update_block_position(block.id, 5).await.unwrap();

        assert!(matches!(
            rx.try_recv().unwrap(),
            StoreEvent::ReportCreated { .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            StoreEvent::BlockCreated { .. }
        ));
        match rx.try_recv().unwrap() {
            StoreEvent::BlockMoved { block_id, position, .. } => {
                assert_eq!(block_id, block.id);
                assert_eq!(position, 5);
            }
            other => panic!("expected BlockMoved, got {:?}", other),
        }
    }

    // ── Concurrency ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_concurrent_creates() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let store = Arc::new(MemoryStore::new());
        let report = seed_report(&store, UserId::local()).await;

        let mut tasks = JoinSet::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let report = report.clone();
            tasks.spawn(async move {
                for j in 0..10 {
                    store
                        .create_block(new_block(&report, (i * 10 + j) as i64))
                        .await
                        .unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.expect("task panicked");
        }

        let listed = store.list_blocks(report.id).await.unwrap();
        assert_eq!(listed.len(), 80);
        // Render order is total and sorted.
        for pair in listed.windows(2) {
            assert!(pair[0].sort_key() <= pair[1].sort_key());
        }
    }
}

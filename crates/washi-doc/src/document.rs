//! The document controller.
//!
//! [`ReportDocument`] owns the authoritative in-memory block collection
//! for one open report plus the single selection. Views get read-only
//! access and request every mutation through it; nothing else touches
//! the collection.
//!
//! Mutation styles differ deliberately:
//! - content edits (`apply_style`, `update_text`, table edits) are
//!   optimistic: local state updates first, the store write follows, and
//!   a store failure is returned with local state kept (the store is
//!   stale until the user retries);
//! - `reorder` is the opposite: positions fan out to the store
//!   concurrently and the new local order is committed only when every
//!   write succeeded. The store itself has no transaction here, so a
//!   partial failure can leave it with mixed positions, an accepted
//!   race, surfaced as an error rather than silently half-applied.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, warn};

use washi_store::{BlockStore, NewBlock};
use washi_types::{
    Alignment, Block, BlockContent, BlockId, BlockKind, Decoration, ReportId, TextStyle, UserId,
};

use crate::error::{DocError, Result};
use crate::html::{strip_tags, style_html};
use crate::slash::{strip_trigger, SlashCommandId};
use crate::view::DropEdge;
use crate::{columns, csv};

/// Where a new block goes.
#[derive(Clone, Copy, Debug)]
pub enum Placement {
    /// Append at the end (position `max + 1`).
    End,
    /// Splice in immediately after an existing block.
    After(BlockId),
}

/// One style-panel mutation on the selected block.
#[derive(Clone, Debug)]
pub enum StyleUpdate {
    /// Text style change; regenerates `html` from the plain text.
    TextStyle(TextStyle),
    Alignment(Alignment),
    Decoration(Option<Decoration>),
    BackgroundColor(Option<String>),
}

/// The single selected block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub id: BlockId,
    pub kind: BlockKind,
}

/// One table-of-contents entry, derived from a heading-styled text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub id: BlockId,
    pub text: String,
    pub level: u8,
}

/// Owned, single-writer state for one open report.
pub struct ReportDocument {
    store: Arc<dyn BlockStore>,
    report_id: ReportId,
    session: Option<UserId>,
    blocks: Vec<Block>,
    selection: Option<Selection>,
}

impl ReportDocument {
    /// Load a report's blocks from the store.
    pub async fn open(
        store: Arc<dyn BlockStore>,
        report_id: ReportId,
        session: Option<UserId>,
    ) -> Result<Self> {
        let mut blocks = store.list_blocks(report_id).await?;
        blocks.sort_by_key(|b| b.sort_key());
        debug!(report = %report_id, blocks = blocks.len(), "opened report");
        Ok(Self {
            store,
            report_id,
            session,
            blocks,
            selection: None,
        })
    }

    pub fn report_id(&self) -> ReportId {
        self.report_id
    }

    /// The blocks in render order. Read-only; mutations go through the
    /// operations below.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select a block. At most one block is selected at a time.
    pub fn select(&mut self, id: BlockId) -> Result<()> {
        let block = self
            .blocks
            .iter()
            .find(|b| b.id == id)
            .ok_or(DocError::BlockNotFound(id))?;
        self.selection = Some(Selection {
            id,
            kind: block.kind(),
        });
        Ok(())
    }

    /// Click on empty canvas: no block selected.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_session(&self) -> Result<UserId> {
        self.session.ok_or(DocError::AuthRequired)
    }

    fn index_of(&self, id: BlockId) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(DocError::BlockNotFound(id))
    }

    /// Renumber `order` densely 1..N and persist every changed position
    /// concurrently. Returns the renumbered blocks only when all writes
    /// succeeded; the caller commits them locally.
    async fn persist_order(&self, mut order: Vec<Block>) -> Result<Vec<Block>> {
        let mut changed = Vec::new();
        for (i, block) in order.iter_mut().enumerate() {
            let position = (i + 1) as i64;
            if block.position != position {
                block.position = position;
                block.touch();
                changed.push((block.id, position));
            }
        }
        debug!(updates = changed.len(), "persisting block order");
        try_join_all(
            changed
                .iter()
                .map(|(id, position)| self.store.update_block_position(*id, *position)),
        )
        .await?;
        Ok(order)
    }

    /// Optimistic content write: local state is already updated; a store
    /// failure is surfaced but not rolled back.
    async fn persist_content(&self, index: usize) -> Result<()> {
        let block = &self.blocks[index];
        if let Err(err) = self.store.update_block(block.id, block.content.clone()).await {
            warn!(block = %block.id, %err, "content write failed; local state kept");
            return Err(err.into());
        }
        Ok(())
    }

    // ── Block lifecycle ─────────────────────────────────────────────────

    /// Create and persist a new block, splice it into local order, and
    /// advance the selection to it.
    pub async fn create_block(
        &mut self,
        content: BlockContent,
        placement: Placement,
    ) -> Result<BlockId> {
        let user = self.require_session()?;

        match placement {
            Placement::End => {
                let position = self.blocks.iter().map(|b| b.position).max().unwrap_or(0) + 1;
                let block = self
                    .store
                    .create_block(NewBlock {
                        report_id: self.report_id,
                        created_by: user,
                        position,
                        content,
                    })
                    .await?;
                let id = block.id;
                let kind = block.kind();
                self.blocks.push(block);
                self.selection = Some(Selection { id, kind });
                debug!(block = %id, position, "appended block");
                Ok(id)
            }
            Placement::After(target) => {
                let target_index = self.index_of(target)?;
                let block = self
                    .store
                    .create_block(NewBlock {
                        report_id: self.report_id,
                        created_by: user,
                        position: self.blocks[target_index].position + 1,
                        content,
                    })
                    .await?;
                let id = block.id;
                let kind = block.kind();

                // Splice after the target, then make the order explicit
                // everywhere with a dense renumber.
                let mut order = self.blocks.clone();
                order.insert(target_index + 1, block);
                let order = self.persist_order(order).await?;
                self.blocks = order;
                self.selection = Some(Selection { id, kind });
                debug!(block = %id, after = %target, "spliced block");
                Ok(id)
            }
        }
    }

    /// Delete one block: exactly one store call, no renumbering of the
    /// survivors.
    pub async fn delete_block(&mut self, id: BlockId) -> Result<()> {
        self.require_session()?;
        let index = self.index_of(id)?;
        self.store.delete_block(id).await?;
        self.blocks.remove(index);
        if self.selection.map(|s| s.id) == Some(id) {
            self.selection = None;
        }
        debug!(block = %id, "deleted block");
        Ok(())
    }

    /// Move `dragged` immediately before or after `target`, renumbering
    /// every block to its 1-based index. Local order changes only when
    /// every store write succeeded.
    pub async fn reorder(&mut self, dragged: BlockId, target: BlockId, edge: DropEdge) -> Result<()> {
        self.require_session()?;
        if dragged == target {
            return Ok(());
        }
        let dragged_index = self.index_of(dragged)?;
        self.index_of(target)?;

        let mut order = self.blocks.clone();
        let moved = order.remove(dragged_index);
        let target_index = order
            .iter()
            .position(|b| b.id == target)
            .ok_or(DocError::BlockNotFound(target))?;
        let insert_at = match edge {
            DropEdge::Before => target_index,
            DropEdge::After => target_index + 1,
        };
        order.insert(insert_at, moved);

        let order = self.persist_order(order).await?;
        self.blocks = order;
        debug!(%dragged, %target, ?edge, "reordered");
        Ok(())
    }

    // ── Content mutation ────────────────────────────────────────────────

    /// Apply a style-panel change to the selected block. Optimistic.
    pub async fn apply_style(&mut self, update: StyleUpdate) -> Result<()> {
        self.require_session()?;
        let selection = self.selection.ok_or(DocError::NoSelection)?;
        let index = self.index_of(selection.id)?;
        let block = &mut self.blocks[index];
        let kind = block.kind();

        match update {
            StyleUpdate::TextStyle(style) => {
                let text = block
                    .content
                    .as_text_mut()
                    .ok_or(DocError::NotATextBlock {
                        id: selection.id,
                        kind,
                    })?;
                text.style = style;
                text.html = style_html(style, &text.text);
            }
            StyleUpdate::Alignment(alignment) => {
                let text = block
                    .content
                    .as_text_mut()
                    .ok_or(DocError::NotATextBlock {
                        id: selection.id,
                        kind,
                    })?;
                text.alignment = Some(alignment);
            }
            StyleUpdate::Decoration(decoration) => block.content.set_decoration(decoration),
            StyleUpdate::BackgroundColor(color) => block.content.set_background_color(color),
        }
        block.touch();
        self.persist_content(index).await
    }

    /// Content-change path from the rich text surface: re-derive the
    /// plain text from the new html (the sync invariant) and persist.
    pub async fn update_text(&mut self, id: BlockId, new_html: &str) -> Result<()> {
        self.require_session()?;
        let index = self.index_of(id)?;
        let block = &mut self.blocks[index];
        let kind = block.kind();
        let text = block
            .content
            .as_text_mut()
            .ok_or(DocError::NotATextBlock { id, kind })?;
        text.html = new_html.to_string();
        text.text = strip_tags(new_html);
        block.touch();
        self.persist_content(index).await
    }

    // ── Table passthroughs ──────────────────────────────────────────────

    fn table_mut(&mut self, id: BlockId) -> Result<(usize, &mut washi_types::TableContent)> {
        let index = self.index_of(id)?;
        let block = &mut self.blocks[index];
        let kind = block.kind();
        match block.content.as_table_mut() {
            Some(table) => Ok((index, table)),
            None => Err(DocError::NotATableBlock { id, kind }),
        }
    }

    /// Overwrite one cell with raw user input, re-infer column types,
    /// persist.
    pub async fn edit_table_cell(
        &mut self,
        id: BlockId,
        row: usize,
        col: usize,
        raw: &str,
    ) -> Result<()> {
        self.require_session()?;
        let (index, table) = self.table_mut(id)?;
        if !table.set_cell(row, col, raw.into()) {
            return Err(DocError::CellOutOfRange { row, col });
        }
        columns::reinfer(table);
        self.blocks[index].touch();
        self.persist_content(index).await
    }

    /// Rename a column header.
    pub async fn edit_table_header(&mut self, id: BlockId, col: usize, name: &str) -> Result<()> {
        self.require_session()?;
        let (index, table) = self.table_mut(id)?;
        if !table.set_header(col, name) {
            return Err(DocError::CellOutOfRange { row: 0, col });
        }
        columns::reinfer(table);
        self.blocks[index].touch();
        self.persist_content(index).await
    }

    pub async fn add_table_row(&mut self, id: BlockId) -> Result<()> {
        self.require_session()?;
        let (index, table) = self.table_mut(id)?;
        table.add_row();
        columns::reinfer(table);
        self.blocks[index].touch();
        self.persist_content(index).await
    }

    pub async fn add_table_column(&mut self, id: BlockId) -> Result<()> {
        self.require_session()?;
        let (index, table) = self.table_mut(id)?;
        table.add_column();
        columns::reinfer(table);
        self.blocks[index].touch();
        self.persist_content(index).await
    }

    /// Replace a table's headers and rows from CSV text. Decoration and
    /// background carry over; an empty import leaves the table untouched.
    pub async fn import_csv(&mut self, id: BlockId, text: &str) -> Result<()> {
        self.require_session()?;
        let imported = csv::import(text)?;
        let (index, table) = self.table_mut(id)?;
        table.headers = imported.headers;
        table.rows = imported.rows;
        table.formatting = imported.formatting;
        self.blocks[index].touch();
        self.persist_content(index).await
    }

    /// Create a new table block from CSV text. The CSV is parsed before
    /// anything is created, so a failed import leaves no block behind.
    pub async fn create_table_from_csv(
        &mut self,
        text: &str,
        placement: Placement,
    ) -> Result<BlockId> {
        self.require_session()?;
        let table = csv::import(text)?;
        self.create_block(BlockContent::Table(table), placement).await
    }

    // ── Slash commands ──────────────────────────────────────────────────

    /// Invoke a slash command triggered from a text block: strip the
    /// trailing `/` (and any whitespace before it) from the source, then
    /// insert the command's block immediately after. The stripped source
    /// text seeds a text-style command's new block.
    pub async fn invoke_slash_command(
        &mut self,
        source: BlockId,
        command: SlashCommandId,
    ) -> Result<BlockId> {
        self.require_session()?;
        let index = self.index_of(source)?;
        let block = &mut self.blocks[index];
        let mut seed = String::new();
        if let Some(text) = block.content.as_text_mut() {
            if text.text.ends_with('/') {
                text.text = strip_trigger(&text.text).trim_end().to_string();
                text.html = style_html(text.style, &text.text);
                seed = text.text.clone();
                block.touch();
                self.persist_content(index).await?;
            }
        }
        self.create_block(command.content_for(&seed), Placement::After(source))
            .await
    }

    // ── Projections ─────────────────────────────────────────────────────

    /// Derive the table of contents: heading-styled text blocks in
    /// document order. Pure, recomputed on demand, never persisted.
    pub fn table_of_contents(&self) -> Vec<TocEntry> {
        self.blocks
            .iter()
            .filter_map(|block| {
                let text = block.content.as_text()?;
                let level = text.style.heading_level()?;
                Some(TocEntry {
                    id: block.id,
                    text: text.text.clone(),
                    level,
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

//! The block envelope: identity, placement, payload, audit metadata.
//!
//! A [`Block`] is one row of a report. Everything type-dependent lives in
//! its [`BlockContent`]; the envelope itself is uniform across variants so
//! stores and the document controller never need to know what kind of
//! block they are moving around.

use serde::{Deserialize, Serialize};

use crate::content::{BlockContent, BlockKind};
use crate::ids::{BlockId, ReportId};
use crate::now_millis;

/// Audit timestamps, Unix milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub created_at: u64,
    pub updated_at: u64,
}

impl BlockMetadata {
    /// Fresh metadata with both timestamps set to now.
    pub fn now() -> Self {
        let t = now_millis();
        Self {
            created_at: t,
            updated_at: t,
        }
    }

    /// Bump `updated_at`. Monotonic even if the clock stepped backwards.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }
}

impl Default for BlockMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// One block of a report.
///
/// `position` is a sparse ordering key: appends allocate `max + 1`, and
/// only a reorder renumbers densely. Render order is always
/// `(position, id)`; the UUIDv7 id breaks ties in creation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub report_id: ReportId,
    pub position: i64,
    pub content: BlockContent,
    pub metadata: BlockMetadata,
}

impl Block {
    /// Create a block with a fresh id and fresh metadata.
    pub fn new(report_id: ReportId, position: i64, content: BlockContent) -> Self {
        Self {
            id: BlockId::new(),
            report_id,
            position,
            content,
            metadata: BlockMetadata::now(),
        }
    }

    /// The variant tag of this block's content.
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// The total ordering key within a report.
    pub fn sort_key(&self) -> (i64, BlockId) {
        (self.position, self.id)
    }

    /// Bump the audit timestamp after a content or position edit.
    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}

// ============================================================================
// Tests
// ============================================================================

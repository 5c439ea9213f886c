//! Shared identity and block types for Washi.
//!
//! This crate is the relational foundation: typed IDs, reports, the block
//! envelope, and the closed set of block content variants. It has **no
//! internal washi dependencies**: a pure leaf crate that other crates
//! build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! User (UserId)
//!     └── owns Report (ReportId)
//!
//! Report (ReportId)
//!     └── owns ordered Blocks (one-to-many, cascade delete)
//!
//! Block (BlockId)
//!     └── position: ordering key within its report
//!     └── content: one of six tagged variants (text/table/chart/embed/image/metric)
//!     └── metadata: created_at / updated_at audit timestamps
//! ```
//!
//! A block never outlives its report, and its content shape is fully
//! determined by the variant tag; consumers dispatch with an exhaustive
//! `match` on [`BlockContent`], never by reading fields off the wrong
//! variant.

pub mod block;
pub mod content;
pub mod ids;
pub mod report;

// Re-export primary types at crate root for convenience.
pub use block::{Block, BlockMetadata};
pub use content::{
    Alignment, BlockContent, BlockKind, CellValue, ChartContent, ChartOptions, ChartPoint, ChartType,
    ColumnType, Decoration, EmbedContent, EmbedType, ImageAlignment, ImageContent, Metric,
    MetricContent, MetricFormat, MetricStyle, TableContent, TableFormatting, TextContent,
    TextStyle,
};
pub use ids::{BlockId, PrefixError, ReportId, UserId, resolve_block_prefix};
pub use report::Report;

/// Current time as Unix milliseconds. Used by constructors throughout the crate.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

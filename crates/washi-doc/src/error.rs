//! Document-level error types.

use washi_types::{BlockId, BlockKind};

pub use washi_store::StoreError;

pub type Result<T> = std::result::Result<T, DocError>;

/// Errors from document operations. None is fatal; every failure is local
/// to the attempted operation and the user can simply retry.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The store rejected or failed a call. Local state is last-known-good.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A mutation was attempted without a signed-in user. Raised before
    /// any store call.
    #[error("sign in required")]
    AuthRequired,

    /// An operation needed a selected block and none is selected.
    #[error("no block selected")]
    NoSelection,

    #[error("block not found in document: {0}")]
    BlockNotFound(BlockId),

    /// A text-only operation hit another variant.
    #[error("block {id} is a {kind} block, not text")]
    NotATextBlock { id: BlockId, kind: BlockKind },

    /// A table-only operation hit another variant.
    #[error("block {id} is a {kind} block, not a table")]
    NotATableBlock { id: BlockId, kind: BlockKind },

    #[error("table cell out of range: row {row}, column {col}")]
    CellOutOfRange { row: usize, col: usize },

    /// CSV import produced no headers or rows. Callers treat this as a
    /// no-op on the table.
    #[error("import contained no usable rows")]
    EmptyImport,
}

//! # washi-doc
//!
//! Document core for washi: everything between the stores and a host
//! surface.
//!
//! The centerpiece is [`ReportDocument`], the single-writer controller
//! that owns one open report's blocks and selection. Around it:
//! - style projection and tag stripping ([`html`])
//! - column type inference and value formatting ([`columns`])
//! - CSV import ([`csv`])
//! - the slash command menu ([`slash`])
//! - block-boundary key semantics for text surfaces ([`editor`])
//! - per-type block rendering and drop geometry ([`view`])
//!
//! Everything here is host-agnostic. Rendering emits plain HTML strings
//! and the rich text surface is a trait; the embedding application
//! supplies the actual widgets.

pub mod columns;
pub mod csv;
pub mod document;
pub mod editor;
pub mod error;
pub mod html;
pub mod slash;
pub mod view;

pub use columns::{format_value, infer_column, infer_table, parse_value};
pub use document::{Placement, ReportDocument, Selection, StyleUpdate, TocEntry};
pub use editor::{EditAction, EditContext, EditorKey, RichTextInput, resolve_key};
pub use error::{DocError, Result};
pub use html::{strip_tags, style_html};
pub use slash::{
    COMMANDS, MenuKey, MenuOutcome, SlashCommand, SlashCommandId, SlashGroup, SlashMenu,
};
pub use view::{DropEdge, RenderMode, drop_edge, render_block};

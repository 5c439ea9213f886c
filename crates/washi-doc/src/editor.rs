//! The rich text input contract.
//!
//! A text block's editable surface is host-provided (a contenteditable
//! region, a TUI widget, whatever embeds the library). [`RichTextInput`]
//! is the contract it fulfills; [`resolve_key`] is the pure
//! block-boundary logic every host shares, so Enter/Backspace semantics
//! stay identical across surfaces.

use washi_types::TextStyle;

/// What a host editable surface must provide to a text block view.
pub trait RichTextInput {
    /// Replace the surface's content wholesale.
    fn set_html(&mut self, html: &str);

    /// Current content as HTML.
    fn html(&self) -> String;

    fn editable(&self) -> bool;

    /// Shown when the surface is empty.
    fn placeholder(&self) -> &str;

    /// Content changed; the view persists through the document controller.
    fn on_change(&mut self, html: &str);

    /// A sibling block of the same style should be created after this one.
    fn on_create_sibling(&mut self);

    /// This block should be deleted (focus moves to the previous block;
    /// the focus transfer itself is a host nicety, not correctness).
    fn on_delete_self(&mut self);
}

/// Key presses the resolver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
    Enter,
    Backspace,
    /// Any other input character.
    Char(char),
}

/// The state the resolver needs about the caret's surroundings.
#[derive(Clone, Copy, Debug)]
pub struct EditContext {
    pub style: TextStyle,
    /// The whole block is empty.
    pub block_empty: bool,
    /// The caret sits in an empty list item (meaningless outside lists).
    pub list_item_empty: bool,
    pub shift: bool,
}

/// What the surface should do with a key press. `None` means the key is
/// ordinary input and the surface handles it natively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Commit content and create a same-style sibling block after.
    CommitAndCreateSibling,
    /// Append a new list item inside this block.
    NewListItem,
    /// Leave the list: commit and start a fresh paragraph block.
    LiftOutToParagraph,
    /// Soft line break rendered as a block-level spacer.
    SoftBreak,
    /// Delete this block.
    DeleteSelf,
    /// Open the slash command menu at the caret.
    OpenSlashMenu,
}

/// Block-boundary key semantics shared by every host surface.
pub fn resolve_key(key: EditorKey, ctx: &EditContext) -> Option<EditAction> {
    match key {
        EditorKey::Enter if ctx.shift => Some(EditAction::SoftBreak),
        EditorKey::Enter => {
            if ctx.style.is_list() {
                if ctx.list_item_empty {
                    Some(EditAction::LiftOutToParagraph)
                } else {
                    Some(EditAction::NewListItem)
                }
            } else {
                Some(EditAction::CommitAndCreateSibling)
            }
        }
        EditorKey::Backspace if ctx.block_empty => Some(EditAction::DeleteSelf),
        EditorKey::Backspace => None,
        EditorKey::Char('/') => Some(EditAction::OpenSlashMenu),
        EditorKey::Char(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

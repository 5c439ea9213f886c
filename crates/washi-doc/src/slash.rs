//! The slash command menu.
//!
//! Typing a trailing `/` in a text block opens a grouped command list.
//! The menu holds one selected index over the flattened command list;
//! arrow keys wrap in both directions, Enter invokes the selection,
//! Escape closes, and a direct click invokes a command regardless of the
//! keyboard selection. Invoking strips the trailing `/` from the source
//! text and yields the new block's default content.

use washi_types::{
    BlockContent, ChartContent, ChartType, MetricContent, TableContent, TextContent, TextStyle,
};

use crate::html::style_html;

/// Every command the menu offers, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlashCommandId {
    Heading1,
    Heading2,
    Heading3,
    Text,
    Strong,
    Caption,
    Quote,
    BulletList,
    NumberedList,
    Metric,
    Table,
    Chart,
}

/// Menu section a command is displayed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlashGroup {
    TextStyle,
    List,
    Blocks,
}

impl SlashGroup {
    pub fn label(&self) -> &'static str {
        match self {
            SlashGroup::TextStyle => "Text Style",
            SlashGroup::List => "List",
            SlashGroup::Blocks => "Blocks",
        }
    }
}

/// One entry of the menu.
#[derive(Clone, Copy, Debug)]
pub struct SlashCommand {
    pub id: SlashCommandId,
    pub label: &'static str,
    pub group: SlashGroup,
}

/// The flattened command list, in the order the menu displays it.
pub const COMMANDS: &[SlashCommand] = &[
    SlashCommand { id: SlashCommandId::Heading1, label: "Heading 1", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Heading2, label: "Heading 2", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Heading3, label: "Heading 3", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Text, label: "Text", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Strong, label: "Strong", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Caption, label: "Caption", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::Quote, label: "Quote", group: SlashGroup::TextStyle },
    SlashCommand { id: SlashCommandId::BulletList, label: "Bullet List", group: SlashGroup::List },
    SlashCommand { id: SlashCommandId::NumberedList, label: "Numbered List", group: SlashGroup::List },
    SlashCommand { id: SlashCommandId::Metric, label: "Metric", group: SlashGroup::Blocks },
    SlashCommand { id: SlashCommandId::Table, label: "Table", group: SlashGroup::Blocks },
    SlashCommand { id: SlashCommandId::Chart, label: "Chart", group: SlashGroup::Blocks },
];

fn text_defaults(style: TextStyle, text: &str) -> BlockContent {
    BlockContent::Text(TextContent {
        html: style_html(style, text),
        text: text.to_string(),
        style,
        ..Default::default()
    })
}

impl SlashCommandId {
    /// The content a freshly inserted block of this kind carries. For the
    /// text-style commands a non-empty `seed` (the source block's text,
    /// trigger stripped) becomes the new block's text; the fixed label is
    /// the fallback. Block commands always use their starters.
    pub fn content_for(&self, seed: &str) -> BlockContent {
        let seed = seed.trim();
        let seeded = |style: TextStyle, fallback: &str| {
            text_defaults(style, if seed.is_empty() { fallback } else { seed })
        };
        match self {
            SlashCommandId::Heading1 => seeded(TextStyle::Heading1, "Heading 1"),
            SlashCommandId::Heading2 => seeded(TextStyle::Heading2, "Heading 2"),
            SlashCommandId::Heading3 => seeded(TextStyle::Heading3, "Heading 3"),
            SlashCommandId::Text if seed.is_empty() => {
                BlockContent::Text(TextContent::empty_paragraph())
            }
            SlashCommandId::Text => text_defaults(TextStyle::Paragraph, seed),
            SlashCommandId::Strong => seeded(TextStyle::Strong, "Strong text"),
            SlashCommandId::Caption => seeded(TextStyle::Caption, "Caption text"),
            SlashCommandId::Quote => seeded(TextStyle::Quote, "Quote"),
            SlashCommandId::BulletList => seeded(TextStyle::BulletList, "List item"),
            SlashCommandId::NumberedList => seeded(TextStyle::NumberedList, "List item"),
            SlashCommandId::Metric => BlockContent::Metric(MetricContent::starter()),
            SlashCommandId::Table => BlockContent::Table(TableContent::starter()),
            SlashCommandId::Chart => BlockContent::Chart(ChartContent::empty(ChartType::Bar)),
        }
    }

    /// `content_for` with no seed text.
    pub fn default_content(&self) -> BlockContent {
        self.content_for("")
    }
}

/// Keys the open menu consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// What a key press did to the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Selection moved; menu stays open.
    Moved,
    /// A command was chosen; menu closes.
    Invoke(SlashCommandId),
    /// Menu closed with no action.
    Closed,
}

/// Keyboard state of an open menu.
#[derive(Clone, Debug, Default)]
pub struct SlashMenu {
    selected: usize,
}

impl SlashMenu {
    /// A freshly opened menu, first command selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_command(&self) -> &'static SlashCommand {
        &COMMANDS[self.selected]
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: MenuKey) -> MenuOutcome {
        match key {
            MenuKey::ArrowDown => {
                self.selected = (self.selected + 1) % COMMANDS.len();
                MenuOutcome::Moved
            }
            MenuKey::ArrowUp => {
                self.selected = (self.selected + COMMANDS.len() - 1) % COMMANDS.len();
                MenuOutcome::Moved
            }
            MenuKey::Enter => MenuOutcome::Invoke(self.selected_command().id),
            MenuKey::Escape => MenuOutcome::Closed,
        }
    }

    /// Direct click invocation, ignoring the keyboard selection.
    pub fn click(&self, id: SlashCommandId) -> MenuOutcome {
        MenuOutcome::Invoke(id)
    }
}

/// Remove the `/` that triggered the menu from the source text.
pub fn strip_trigger(text: &str) -> &str {
    text.strip_suffix('/').unwrap_or(text)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use washi_types::{BlockKind, MetricStyle};

    #[test]
    fn test_command_groups() {
        let text_styles = COMMANDS.iter().filter(|c| c.group == SlashGroup::TextStyle).count();
        let lists = COMMANDS.iter().filter(|c| c.group == SlashGroup::List).count();
        let blocks = COMMANDS.iter().filter(|c| c.group == SlashGroup::Blocks).count();
        assert_eq!((text_styles, lists, blocks), (7, 2, 3));
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut menu = SlashMenu::new();
        for _ in 0..COMMANDS.len() {
            assert_eq!(menu.handle_key(MenuKey::ArrowDown), MenuOutcome::Moved);
        }
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_arrow_up_wraps_backwards() {
        let mut menu = SlashMenu::new();
        menu.handle_key(MenuKey::ArrowUp);
        assert_eq!(menu.selected_index(), COMMANDS.len() - 1);
        assert_eq!(menu.selected_command().id, SlashCommandId::Chart);
    }

    #[test]
    fn test_enter_invokes_selected() {
        let mut menu = SlashMenu::new();
        menu.handle_key(MenuKey::ArrowDown);
        assert_eq!(
            menu.handle_key(MenuKey::Enter),
            MenuOutcome::Invoke(SlashCommandId::Heading2)
        );
    }

    #[test]
    fn test_escape_closes_without_action() {
        let mut menu = SlashMenu::new();
        assert_eq!(menu.handle_key(MenuKey::Escape), MenuOutcome::Closed);
    }

    #[test]
    fn test_click_bypasses_keyboard_selection() {
        let menu = SlashMenu::new();
        assert_eq!(
            menu.click(SlashCommandId::Table),
            MenuOutcome::Invoke(SlashCommandId::Table)
        );
    }

    #[test]
    fn test_strip_trigger() {
        assert_eq!(strip_trigger("some text/"), "some text");
        assert_eq!(strip_trigger("no trigger"), "no trigger");
    }

    // ── Default contents ────────────────────────────────────────────────

    #[test]
    fn test_seed_text_carries_into_text_styles() {
        match SlashCommandId::Heading2.content_for("Q3 results") {
            BlockContent::Text(c) => {
                assert_eq!(c.text, "Q3 results");
                assert_eq!(c.html, "<h2>Q3 results</h2>");
            }
            other => panic!("expected text content, got {:?}", other.kind()),
        }
        // Whitespace-only seed falls back to the label.
        match SlashCommandId::Quote.content_for("   ") {
            BlockContent::Text(c) => assert_eq!(c.text, "Quote"),
            other => panic!("expected text content, got {:?}", other.kind()),
        }
        // Block commands ignore the seed.
        match SlashCommandId::Table.content_for("Q3 results") {
            BlockContent::Table(t) => assert_eq!(t.headers.len(), 3),
            other => panic!("expected table content, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_heading_default() {
        match SlashCommandId::Heading2.default_content() {
            BlockContent::Text(c) => {
                assert_eq!(c.html, "<h2>Heading 2</h2>");
                assert_eq!(c.text, "Heading 2");
            }
            other => panic!("expected text content, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_table_default_is_starter() {
        match SlashCommandId::Table.default_content() {
            BlockContent::Table(t) => {
                assert_eq!(t.headers.len(), 3);
                assert_eq!(t.rows.len(), 2);
            }
            other => panic!("expected table content, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_metric_default_is_teal_card() {
        match SlashCommandId::Metric.default_content() {
            BlockContent::Metric(m) => {
                assert_eq!(m.metrics.len(), 2);
                assert_eq!(m.style, MetricStyle::Card);
                assert_eq!(m.background_color.as_deref(), Some("teal"));
            }
            other => panic!("expected metric content, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_chart_default_is_empty_bar() {
        let content = SlashCommandId::Chart.default_content();
        assert_eq!(content.kind(), BlockKind::Chart);
        match content {
            BlockContent::Chart(c) => {
                assert_eq!(c.chart_type, ChartType::Bar);
                assert!(c.data.is_empty());
            }
            _ => unreachable!(),
        }
    }
}

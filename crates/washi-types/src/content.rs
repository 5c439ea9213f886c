//! Block content variants: the closed, tag-dispatched union.
//!
//! `BlockContent` is the heart of the model: one variant per block type,
//! discriminated on the wire by a `type` tag. The shape of the payload is
//! fully determined by the tag, so every consumer (renderer, style panel,
//! slash menu) dispatches with an exhaustive `match`; adding a block type
//! means extending this enum and every site the compiler then points at.
//!
//! Two presentation attributes cut across all variants: an optional
//! `decoration` (focus/card) and an optional `background_color`. They live
//! on each variant's struct (the wire format keeps them inside `content`)
//! with uniform accessors on the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::BlockId;

/// What a block *is*: the companion tag enum for [`BlockContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    #[default]
    Text,
    Table,
    Chart,
    Embed,
    Image,
    Metric,
}

impl BlockKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Table => "table",
            BlockKind::Chart => "chart",
            BlockKind::Embed => "embed",
            BlockKind::Image => "image",
            BlockKind::Metric => "metric",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cross-cutting block decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Decoration {
    Focus,
    Card,
}

/// Paragraph-level text style. Each style maps to one fixed HTML wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum TextStyle {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Quote,
    Strong,
    Caption,
    #[strum(serialize = "bulletlist", serialize = "bullet_list")]
    BulletList,
    #[strum(serialize = "numberedlist", serialize = "numbered_list")]
    NumberedList,
}

impl TextStyle {
    /// Heading level 1-3 for heading styles, `None` otherwise.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            TextStyle::Heading1 => Some(1),
            TextStyle::Heading2 => Some(2),
            TextStyle::Heading3 => Some(3),
            _ => None,
        }
    }

    /// True for the two list styles, which have item-per-line semantics.
    pub fn is_list(&self) -> bool {
        matches!(self, TextStyle::BulletList | TextStyle::NumberedList)
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Image placement, which adds a full-bleed option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ImageAlignment {
    Left,
    #[default]
    Center,
    Right,
    Full,
}

impl ImageAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageAlignment::Left => "left",
            ImageAlignment::Center => "center",
            ImageAlignment::Right => "right",
            ImageAlignment::Full => "full",
        }
    }
}

impl fmt::Display for ImageAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart rendering family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ChartType {
    Line,
    #[default]
    Bar,
    Pie,
    Area,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Embed host family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum EmbedType {
    Youtube,
    Figma,
    #[default]
    Iframe,
}

impl EmbedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::Youtube => "youtube",
            EmbedType::Figma => "figma",
            EmbedType::Iframe => "iframe",
        }
    }
}

impl fmt::Display for EmbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display format for a single metric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MetricFormat {
    Currency,
    Percentage,
    Number,
}

/// Visual treatment of a metric grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MetricStyle {
    #[default]
    Default,
    Card,
    Focus,
}

impl MetricStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStyle::Default => "default",
            MetricStyle::Card => "card",
            MetricStyle::Focus => "focus",
        }
    }
}

impl fmt::Display for MetricStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inferred type of one table column. Persisted in
/// `TableContent::formatting` so view mode never re-infers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Currency,
    Percentage,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Currency => "currency",
            ColumnType::Percentage => "percentage",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One table cell or metric value. The wire format admits bare JSON
/// numbers and strings interchangeably, so this is an untagged union.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// The empty cell.
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// True for empty or whitespace-only text cells.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Numeric value if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0"; cells came in as
            // text like "100" and should echo back the same way.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ── Variant payloads ────────────────────────────────────────────────────────

/// Rich text block content.
///
/// Invariant: `text` is always the tag-stripped projection of `html` at
/// the time of last save, the system's one explicit consistency rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    /// Rendered markup.
    pub html: String,
    /// Plain-text mirror of `html`, used for search and TOC extraction.
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl TextContent {
    /// An empty paragraph, the default content for a fresh text block.
    pub fn empty_paragraph() -> Self {
        Self {
            html: "<p></p>".to_string(),
            ..Default::default()
        }
    }
}

/// Per-column formatting attached to a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableFormatting {
    pub column_types: Vec<ColumnType>,
}

/// Tabular block content. Rectangular: every row has one cell per header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<TableFormatting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl TableContent {
    /// The 3x2 starter table inserted by the slash menu.
    pub fn starter() -> Self {
        Self {
            headers: vec![
                "Column 1".to_string(),
                "Column 2".to_string(),
                "Column 3".to_string(),
            ],
            rows: vec![
                vec![
                    "Row 1, Cell 1".into(),
                    "Row 1, Cell 2".into(),
                    "Row 1, Cell 3".into(),
                ],
                vec![
                    "Row 2, Cell 1".into(),
                    "Row 2, Cell 2".into(),
                    "Row 2, Cell 3".into(),
                ],
            ],
            ..Default::default()
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Check the rectangularity invariant.
    pub fn is_rectangular(&self) -> bool {
        let width = self.headers.len();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// Pad (with empty cells) or truncate every row to the header width.
    pub fn normalize(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, CellValue::empty());
        }
    }

    /// Rename a column. Returns false when `col` is out of range.
    pub fn set_header(&mut self, col: usize, name: impl Into<String>) -> bool {
        match self.headers.get_mut(col) {
            Some(h) => {
                *h = name.into();
                true
            }
            None => false,
        }
    }

    /// Overwrite one cell. Returns false when out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Append an empty row.
    pub fn add_row(&mut self) {
        self.rows.push(vec![CellValue::empty(); self.headers.len()]);
    }

    /// Append a column named `Column N` with empty cells in every row.
    pub fn add_column(&mut self) {
        self.headers.push(format!("Column {}", self.headers.len() + 1));
        for row in &mut self.rows {
            row.push(CellValue::empty());
        }
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |r| r.get(col))
    }
}

/// One data point of a chart series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

/// Axis labels and title for a chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
}

/// Chart block content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    pub chart_type: ChartType,
    pub data: Vec<ChartPoint>,
    /// Back-reference to a table block the data came from. Lookup only,
    /// never ownership; a dangling reference is not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_block_id: Option<BlockId>,
    #[serde(default)]
    pub options: ChartOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl ChartContent {
    /// An empty chart of the given family.
    pub fn empty(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Default::default()
        }
    }
}

/// Embedded external content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbedContent {
    pub url: String,
    pub embed_type: EmbedType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Image block content. The URL points at external storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub url: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub alignment: ImageAlignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// One labeled metric in a metric grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<MetricFormat>,
}

fn default_metric_columns() -> u8 {
    4
}

/// Metric grid block content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricContent {
    pub metrics: Vec<Metric>,
    /// Grid width: 2, 3, or 4. Anything else is clamped at render time.
    #[serde(default = "default_metric_columns")]
    pub columns: u8,
    #[serde(default)]
    pub style: MetricStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<Decoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Default for MetricContent {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            columns: default_metric_columns(),
            style: MetricStyle::default(),
            decoration: None,
            background_color: None,
        }
    }
}

impl MetricContent {
    /// The two-metric teal card inserted by the slash menu.
    pub fn starter() -> Self {
        Self {
            metrics: vec![
                Metric {
                    label: "Metric 1".to_string(),
                    value: "100".into(),
                    format: Some(MetricFormat::Number),
                },
                Metric {
                    label: "Metric 2".to_string(),
                    value: "50".into(),
                    format: Some(MetricFormat::Percentage),
                },
            ],
            columns: 2,
            style: MetricStyle::Card,
            decoration: None,
            background_color: Some("teal".to_string()),
        }
    }

    /// Grid width clamped to the supported 2/3/4 range.
    pub fn grid_columns(&self) -> u8 {
        match self.columns {
            2 | 3 | 4 => self.columns,
            _ => 4,
        }
    }
}

// ── The union ───────────────────────────────────────────────────────────────

/// A block's type-dependent payload, discriminated by the `type` tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockContent {
    Text(TextContent),
    Table(TableContent),
    Chart(ChartContent),
    Embed(EmbedContent),
    Image(ImageContent),
    Metric(MetricContent),
}

impl BlockContent {
    /// The companion tag for this variant.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Table(_) => BlockKind::Table,
            BlockContent::Chart(_) => BlockKind::Chart,
            BlockContent::Embed(_) => BlockKind::Embed,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Metric(_) => BlockKind::Metric,
        }
    }

    /// The cross-cutting decoration, whichever variant this is.
    pub fn decoration(&self) -> Option<Decoration> {
        match self {
            BlockContent::Text(c) => c.decoration,
            BlockContent::Table(c) => c.decoration,
            BlockContent::Chart(c) => c.decoration,
            BlockContent::Embed(c) => c.decoration,
            BlockContent::Image(c) => c.decoration,
            BlockContent::Metric(c) => c.decoration,
        }
    }

    pub fn set_decoration(&mut self, decoration: Option<Decoration>) {
        match self {
            BlockContent::Text(c) => c.decoration = decoration,
            BlockContent::Table(c) => c.decoration = decoration,
            BlockContent::Chart(c) => c.decoration = decoration,
            BlockContent::Embed(c) => c.decoration = decoration,
            BlockContent::Image(c) => c.decoration = decoration,
            BlockContent::Metric(c) => c.decoration = decoration,
        }
    }

    /// The cross-cutting background color, whichever variant this is.
    pub fn background_color(&self) -> Option<&str> {
        match self {
            BlockContent::Text(c) => c.background_color.as_deref(),
            BlockContent::Table(c) => c.background_color.as_deref(),
            BlockContent::Chart(c) => c.background_color.as_deref(),
            BlockContent::Embed(c) => c.background_color.as_deref(),
            BlockContent::Image(c) => c.background_color.as_deref(),
            BlockContent::Metric(c) => c.background_color.as_deref(),
        }
    }

    pub fn set_background_color(&mut self, color: Option<String>) {
        match self {
            BlockContent::Text(c) => c.background_color = color,
            BlockContent::Table(c) => c.background_color = color,
            BlockContent::Chart(c) => c.background_color = color,
            BlockContent::Embed(c) => c.background_color = color,
            BlockContent::Image(c) => c.background_color = color,
            BlockContent::Metric(c) => c.background_color = color,
        }
    }

    /// Borrow the text payload, if this is a text block.
    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            BlockContent::Text(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match self {
            BlockContent::Text(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow the table payload, if this is a table block.
    pub fn as_table(&self) -> Option<&TableContent> {
        match self {
            BlockContent::Table(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut TableContent> {
        match self {
            BlockContent::Table(c) => Some(c),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

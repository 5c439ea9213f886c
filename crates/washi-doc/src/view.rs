//! Per-type block rendering and drag-and-drop geometry.
//!
//! One renderer per content variant behind a single exhaustive `match`;
//! adding a block type will not compile until it renders. Output is plain
//! HTML; the embedding surface decides what to do with it. Chart, embed,
//! and image render static placeholders (display only, no editing UI).

use washi_types::{
    Block, BlockContent, CellValue, ChartContent, ColumnType, Decoration, EmbedContent,
    ImageContent, MetricContent, MetricFormat, TableContent, TextContent,
};

use crate::columns::format_value;
use crate::html::escape;

/// Whether the block is being displayed or edited. Table cells show raw
/// values in edit mode and formatted values in view mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    View,
    Edit,
}

/// Which side of the target a dragged block lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropEdge {
    Before,
    After,
}

/// Drop edge from the pointer's vertical position within the target.
///
/// The split is 45/55, not 50/50: `Before` iff the pointer is in the top
/// 45% of the target. Exactly 45% lands `After`.
pub fn drop_edge(pointer_y: f64, height: f64) -> DropEdge {
    if height > 0.0 && pointer_y / height < 0.45 {
        DropEdge::Before
    } else {
        DropEdge::After
    }
}

fn wrapper_attrs(block: &Block, selected: bool) -> String {
    let mut classes = format!("block block-{}", block.kind());
    if selected {
        classes.push_str(" selected");
    }
    match block.content.decoration() {
        Some(Decoration::Focus) => classes.push_str(" decoration-focus"),
        Some(Decoration::Card) => classes.push_str(" decoration-card"),
        None => {}
    }
    let mut attrs = format!("class=\"{}\" data-block-id=\"{}\"", classes, block.id.to_hex());
    if let Some(color) = block.content.background_color() {
        attrs.push_str(&format!(" style=\"background-color:{}\"", escape(color)));
    }
    attrs
}

fn render_text(content: &TextContent) -> String {
    // The stored html is already the styled projection.
    content.html.clone()
}

fn render_table(content: &TableContent, mode: RenderMode) -> String {
    // View mode never re-infers; the persisted types are the truth.
    let types = content
        .formatting
        .as_ref()
        .map(|f| f.column_types.clone())
        .unwrap_or_default();
    let col_type = |i: usize| types.get(i).copied().unwrap_or(ColumnType::Text);

    let mut out = String::from("<table><thead><tr>");
    for header in &content.headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &content.rows {
        out.push_str("<tr>");
        for (i, cell) in row.iter().enumerate() {
            let text = match mode {
                RenderMode::Edit => cell.to_string(),
                RenderMode::View => format_value(cell, col_type(i)),
            };
            out.push_str(&format!(
                "<td class=\"cell-{}\">{}</td>",
                col_type(i),
                escape(&text)
            ));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

fn metric_column_type(format: Option<MetricFormat>) -> Option<ColumnType> {
    match format? {
        MetricFormat::Currency => Some(ColumnType::Currency),
        MetricFormat::Percentage => Some(ColumnType::Percentage),
        MetricFormat::Number => Some(ColumnType::Number),
    }
}

fn render_metric(content: &MetricContent) -> String {
    let mut out = format!(
        "<div class=\"metric-grid metric-style-{} metric-cols-{}\">",
        content.style,
        content.grid_columns()
    );
    for metric in &content.metrics {
        let value = match metric_column_type(metric.format) {
            Some(t) => format_value(&metric.value, t),
            None => metric.value.to_string(),
        };
        out.push_str(&format!(
            "<div class=\"metric\"><span class=\"metric-label\">{}</span><span class=\"metric-value\">{}</span></div>",
            escape(&metric.label),
            escape(&value)
        ));
    }
    out.push_str("</div>");
    out
}

fn render_chart(content: &ChartContent) -> String {
    let title = content.options.title.as_deref().unwrap_or("Chart");
    let mut out = format!(
        "<figure class=\"chart chart-{}\"><figcaption>{}</figcaption><ul>",
        content.chart_type,
        escape(title)
    );
    for point in &content.data {
        out.push_str(&format!(
            "<li>{}: {}</li>",
            escape(&point.name),
            CellValue::Number(point.value)
        ));
    }
    out.push_str("</ul></figure>");
    out
}

fn render_embed(content: &EmbedContent) -> String {
    let label = content.title.as_deref().unwrap_or(&content.url);
    format!(
        "<div class=\"embed embed-{}\"><a href=\"{}\">{}</a></div>",
        content.embed_type,
        escape(&content.url),
        escape(label)
    )
}

fn render_image(content: &ImageContent) -> String {
    let mut out = format!(
        "<figure class=\"image align-{}\"><img src=\"{}\" alt=\"{}\">",
        content.alignment,
        escape(&content.url),
        escape(&content.alt)
    );
    if let Some(caption) = &content.caption {
        out.push_str(&format!("<figcaption>{}</figcaption>", escape(caption)));
    }
    out.push_str("</figure>");
    out
}

/// Render one block: the variant body inside a common selected/decorated
/// wrapper.
pub fn render_block(block: &Block, mode: RenderMode, selected: bool) -> String {
    let body = match &block.content {
        BlockContent::Text(c) => render_text(c),
        BlockContent::Table(c) => render_table(c, mode),
        BlockContent::Chart(c) => render_chart(c),
        BlockContent::Embed(c) => render_embed(c),
        BlockContent::Image(c) => render_image(c),
        BlockContent::Metric(c) => render_metric(c),
    };
    format!("<div {}>{}</div>", wrapper_attrs(block, selected), body)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use washi_types::{
        ChartType, Metric, ReportId, TableFormatting, TextStyle,
    };

    fn block(content: BlockContent) -> Block {
        Block::new(ReportId::nil(), 1, content)
    }

    // ── Drop edge ───────────────────────────────────────────────────────

    #[test]
    fn test_drop_edge_split() {
        let height = 100.0;
        assert_eq!(drop_edge(40.0, height), DropEdge::Before);
        assert_eq!(drop_edge(60.0, height), DropEdge::After);
        // Exactly 45% rounds to After.
        assert_eq!(drop_edge(45.0, height), DropEdge::After);
        assert_eq!(drop_edge(44.999, height), DropEdge::Before);
    }

    #[test]
    fn test_drop_edge_degenerate_height() {
        assert_eq!(drop_edge(10.0, 0.0), DropEdge::After);
    }

    // ── Wrapper ─────────────────────────────────────────────────────────

    #[test]
    fn test_wrapper_carries_kind_selection_and_id() {
        let b = block(BlockContent::Text(TextContent::empty_paragraph()));
        let html = render_block(&b, RenderMode::View, true);
        assert!(html.contains("block-text"));
        assert!(html.contains("selected"));
        assert!(html.contains(&b.id.to_hex()));
    }

    #[test]
    fn test_wrapper_decoration_and_background() {
        let mut content = BlockContent::Text(TextContent::empty_paragraph());
        content.set_decoration(Some(Decoration::Card));
        content.set_background_color(Some("teal".to_string()));
        let html = render_block(&block(content), RenderMode::View, false);
        assert!(html.contains("decoration-card"));
        assert!(html.contains("background-color:teal"));
        assert!(!html.contains("selected"));
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn test_text_block_emits_stored_html() {
        let content = BlockContent::Text(TextContent {
            html: "<h1>Intro</h1>".to_string(),
            text: "Intro".to_string(),
            style: TextStyle::Heading1,
            ..Default::default()
        });
        let html = render_block(&block(content), RenderMode::View, false);
        assert!(html.contains("<h1>Intro</h1>"));
    }

    // ── Table ───────────────────────────────────────────────────────────

    fn revenue_table() -> TableContent {
        TableContent {
            headers: vec!["Name".to_string(), "Revenue".to_string()],
            rows: vec![
                vec!["Acme".into(), "1234.5".into()],
                vec!["Beta".into(), "200".into()],
            ],
            formatting: Some(TableFormatting {
                column_types: vec![ColumnType::Text, ColumnType::Currency],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_view_mode_formats_with_persisted_types() {
        let html = render_block(
            &block(BlockContent::Table(revenue_table())),
            RenderMode::View,
            false,
        );
        assert!(html.contains("<th>Revenue</th>"));
        assert!(html.contains("$1,234.50"));
        assert!(html.contains("$200.00"));
    }

    #[test]
    fn test_table_edit_mode_shows_raw_values() {
        let html = render_block(
            &block(BlockContent::Table(revenue_table())),
            RenderMode::Edit,
            false,
        );
        assert!(html.contains(">1234.5<"));
        assert!(!html.contains("$1,234.50"));
    }

    // ── Metric ──────────────────────────────────────────────────────────

    #[test]
    fn test_metric_grid_formats_values() {
        let content = MetricContent {
            metrics: vec![
                Metric {
                    label: "ARR".to_string(),
                    value: CellValue::Number(1200000.0),
                    format: Some(MetricFormat::Currency),
                },
                Metric {
                    label: "Growth".to_string(),
                    value: "12.5".into(),
                    format: Some(MetricFormat::Percentage),
                },
            ],
            columns: 2,
            ..Default::default()
        };
        let html = render_block(&block(BlockContent::Metric(content)), RenderMode::View, false);
        assert!(html.contains("metric-cols-2"));
        assert!(html.contains("$1,200,000.00"));
        assert!(html.contains("12.5%"));
    }

    // ── Placeholders ────────────────────────────────────────────────────

    #[test]
    fn test_chart_placeholder_lists_points() {
        let mut content = ChartContent::empty(ChartType::Line);
        content.data.push(washi_types::ChartPoint {
            name: "Q1".to_string(),
            value: 10.0,
        });
        let html = render_block(&block(BlockContent::Chart(content)), RenderMode::View, false);
        assert!(html.contains("chart-line"));
        assert!(html.contains("<li>Q1: 10</li>"));
    }

    #[test]
    fn test_embed_and_image_placeholders() {
        let embed = EmbedContent {
            url: "https://example.com/deck".to_string(),
            title: Some("Deck".to_string()),
            ..Default::default()
        };
        let html = render_block(&block(BlockContent::Embed(embed)), RenderMode::View, false);
        assert!(html.contains("embed-iframe"));
        assert!(html.contains(">Deck</a>"));

        let image = ImageContent {
            url: "https://example.com/a.png".to_string(),
            alt: "chart".to_string(),
            caption: Some("fig 1".to_string()),
            ..Default::default()
        };
        let html = render_block(&block(BlockContent::Image(image)), RenderMode::View, false);
        assert!(html.contains("align-center"));
        assert!(html.contains("<figcaption>fig 1</figcaption>"));
    }
}

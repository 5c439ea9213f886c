//! Style projection: plain text to styled HTML and back.
//!
//! Every [`TextStyle`] maps to one fixed wrapper. The reverse direction,
//! [`strip_tags`], maintains the document invariant that a text block's
//! `text` field is always the tag-stripped projection of its `html`:
//! `strip_tags(style_html(style, text)) == text` for any style and any
//! text without blank interior lines.

use washi_types::TextStyle;

/// Escape text for embedding in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    // &amp; last, so "&amp;lt;" decodes to "&lt;" and not "<".
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn list_items(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<li>{}</li>", escape(line)))
        .collect()
}

/// Render plain text into the fixed HTML wrapper for a style.
///
/// List styles emit one `<li>` per non-blank line of the text.
pub fn style_html(style: TextStyle, text: &str) -> String {
    match style {
        TextStyle::Paragraph => format!("<p>{}</p>", escape(text)),
        TextStyle::Heading1 => format!("<h1>{}</h1>", escape(text)),
        TextStyle::Heading2 => format!("<h2>{}</h2>", escape(text)),
        TextStyle::Heading3 => format!("<h3>{}</h3>", escape(text)),
        TextStyle::Quote => format!("<blockquote>{}</blockquote>", escape(text)),
        TextStyle::Strong => format!("<p><strong>{}</strong></p>", escape(text)),
        TextStyle::Caption => format!("<p class=\"caption\">{}</p>", escape(text)),
        TextStyle::BulletList => format!("<ul>{}</ul>", list_items(text)),
        TextStyle::NumberedList => format!("<ol>{}</ol>", list_items(text)),
    }
}

/// Project HTML back to plain text: tags removed, entities decoded.
///
/// `</li>` and `<br>` become newlines so list items and soft breaks
/// survive the round trip; a single trailing newline is trimmed.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();
    let mut tag = String::new();
    while let Some(c) = chars.next() {
        if c != '<' {
            text.push(c);
            continue;
        }
        tag.clear();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }
        let name = tag.trim_end_matches('/').trim().to_ascii_lowercase();
        if name == "/li" || name == "br" {
            text.push('\n');
        }
    }
    let text = decode_entities(&text);
    text.strip_suffix('\n').map(str::to_string).unwrap_or(text)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Style wrappers ──────────────────────────────────────────────────

    #[test]
    fn test_heading1_wrapper() {
        assert_eq!(style_html(TextStyle::Heading1, "Intro"), "<h1>Intro</h1>");
    }

    #[test]
    fn test_all_scalar_wrappers() {
        assert_eq!(style_html(TextStyle::Paragraph, "x"), "<p>x</p>");
        assert_eq!(style_html(TextStyle::Heading2, "x"), "<h2>x</h2>");
        assert_eq!(style_html(TextStyle::Heading3, "x"), "<h3>x</h3>");
        assert_eq!(style_html(TextStyle::Quote, "x"), "<blockquote>x</blockquote>");
        assert_eq!(style_html(TextStyle::Strong, "x"), "<p><strong>x</strong></p>");
        assert_eq!(style_html(TextStyle::Caption, "x"), "<p class=\"caption\">x</p>");
    }

    #[test]
    fn test_list_one_li_per_line() {
        assert_eq!(
            style_html(TextStyle::BulletList, "a\nb"),
            "<ul><li>a</li><li>b</li></ul>"
        );
        assert_eq!(
            style_html(TextStyle::NumberedList, "a\n\nb"),
            "<ol><li>a</li><li>b</li></ol>"
        );
    }

    #[test]
    fn test_generation_escapes() {
        assert_eq!(
            style_html(TextStyle::Paragraph, "a < b & c"),
            "<p>a &lt; b &amp; c</p>"
        );
    }

    // ── Strip ───────────────────────────────────────────────────────────

    #[test]
    fn test_strip_simple() {
        assert_eq!(strip_tags("<h1>Intro</h1>"), "Intro");
        assert_eq!(strip_tags("<p><strong>bold</strong></p>"), "bold");
    }

    #[test]
    fn test_strip_decodes_entities() {
        assert_eq!(strip_tags("<p>a &lt; b &amp; c</p>"), "a < b & c");
    }

    #[test]
    fn test_strip_list_preserves_lines() {
        assert_eq!(strip_tags("<ul><li>a</li><li>b</li></ul>"), "a\nb");
    }

    #[test]
    fn test_strip_br_becomes_newline() {
        assert_eq!(strip_tags("<p>a<br>b</p>"), "a\nb");
        assert_eq!(strip_tags("<p>a<br/>b</p>"), "a\nb");
    }

    // ── Round trip invariant ────────────────────────────────────────────

    #[test]
    fn test_roundtrip_every_style() {
        let styles = [
            TextStyle::Paragraph,
            TextStyle::Heading1,
            TextStyle::Heading2,
            TextStyle::Heading3,
            TextStyle::Quote,
            TextStyle::Strong,
            TextStyle::Caption,
        ];
        for style in styles {
            for text in ["plain", "5 < 6", "Tom & Jerry", "\"quoted\""] {
                assert_eq!(strip_tags(&style_html(style, text)), text, "{:?}", style);
            }
        }
    }

    #[test]
    fn test_roundtrip_lists() {
        for style in [TextStyle::BulletList, TextStyle::NumberedList] {
            let text = "first\nsecond\nthird";
            assert_eq!(strip_tags(&style_html(style, text)), text);
        }
    }
}

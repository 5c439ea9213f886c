//! Column type inference, formatting, and parsing.
//!
//! A table column is classified as one of `{text, number, currency,
//! percentage}` from its raw cell values. Inference runs on every
//! structural edit while editing; the result is persisted in
//! `TableContent::formatting` so view mode never re-infers.

use washi_types::{CellValue, ColumnType, TableContent, TableFormatting};

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Strip currency symbols, thousands separators, and a trailing `%`,
/// then try to parse what is left as a number.
fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn has_currency_symbol(raw: &str) -> bool {
    raw.chars().any(|c| CURRENCY_SYMBOLS.contains(&c))
}

/// Infer the type of one column from its cell values.
///
/// Empty cells are ignored. Any non-numeric value makes the whole column
/// `text`; otherwise the first matching rule wins, in the order
/// percentage, currency, number.
pub fn infer_column<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
    let mut saw_value = false;
    let mut saw_percent = false;
    let mut saw_currency = false;

    for value in values {
        if value.is_empty() {
            continue;
        }
        saw_value = true;
        let raw = match value {
            CellValue::Number(_) => continue,
            CellValue::Text(s) => s.trim(),
        };
        if parse_numeric(raw).is_none() {
            return ColumnType::Text;
        }
        saw_percent |= raw.ends_with('%');
        saw_currency |= has_currency_symbol(raw);
    }

    if !saw_value {
        ColumnType::Text
    } else if saw_percent {
        ColumnType::Percentage
    } else if saw_currency {
        ColumnType::Currency
    } else {
        ColumnType::Number
    }
}

/// Infer every column of a table.
pub fn infer_table(table: &TableContent) -> Vec<ColumnType> {
    (0..table.column_count())
        .map(|col| infer_column(table.column(col)))
        .collect()
}

/// Re-infer a table's column types and store them in `formatting`.
pub fn reinfer(table: &mut TableContent) {
    table.formatting = Some(TableFormatting {
        column_types: infer_table(table),
    });
}

/// Group an already-rounded decimal string with comma separators.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Comma-grouped rendering of the magnitude, with at most `max_frac`
/// fractional digits and trailing zeros trimmed down to `min_frac`. Sign
/// is the caller's problem (currency puts it outside the `$`).
fn format_magnitude(n: f64, min_frac: usize, max_frac: usize) -> String {
    let rendered = format!("{:.*}", max_frac, n.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rendered.as_str(), ""),
    };
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }
    if frac.is_empty() {
        group_thousands(int_part)
    } else {
        format!("{}.{}", group_thousands(int_part), frac)
    }
}

fn sign_of(n: f64, body: &str) -> &'static str {
    // Avoid "-0" when the magnitude rounded away.
    if n < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    }
}

/// Parse raw user input for a typed column. Returns `Number` when the
/// input is numeric after symbol stripping; otherwise the raw string is
/// kept unchanged (non-fatal, silently falls back to text).
pub fn parse_value(raw: &str, column_type: ColumnType) -> CellValue {
    match column_type {
        ColumnType::Text => CellValue::Text(raw.to_string()),
        ColumnType::Number | ColumnType::Currency | ColumnType::Percentage => {
            match parse_numeric(raw) {
                Some(n) => CellValue::Number(n),
                None => CellValue::Text(raw.to_string()),
            }
        }
    }
}

/// Render a cell for display under its column type.
///
/// The currency symbol is fixed at render time (`$`), not preserved from
/// the input. Non-numeric values pass through unchanged whatever the
/// column type says.
pub fn format_value(value: &CellValue, column_type: ColumnType) -> String {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => match column_type {
            ColumnType::Text => return s.clone(),
            _ => match parse_numeric(s) {
                Some(n) => n,
                None => return s.clone(),
            },
        },
    };
    match column_type {
        ColumnType::Text => value.to_string(),
        ColumnType::Number => {
            let body = format_magnitude(n, 0, 2);
            format!("{}{}", sign_of(n, &body), body)
        }
        ColumnType::Currency => {
            let body = format_magnitude(n, 2, 2);
            format!("{}${}", sign_of(n, &body), body)
        }
        ColumnType::Percentage => {
            let body = format_magnitude(n, 0, 2);
            format!("{}{}%", sign_of(n, &body), body)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    // ── Inference ───────────────────────────────────────────────────────

    #[test]
    fn test_infer_number() {
        assert_eq!(infer_column(&col(&["100", "200", "3.5"])), ColumnType::Number);
    }

    #[test]
    fn test_infer_currency() {
        assert_eq!(infer_column(&col(&["$100", "200"])), ColumnType::Currency);
        assert_eq!(infer_column(&col(&["€1,200.50"])), ColumnType::Currency);
    }

    #[test]
    fn test_infer_percentage() {
        assert_eq!(infer_column(&col(&["10%", "20%"])), ColumnType::Percentage);
    }

    #[test]
    fn test_percentage_beats_currency() {
        assert_eq!(infer_column(&col(&["$100", "20%"])), ColumnType::Percentage);
    }

    #[test]
    fn test_any_parse_failure_means_text() {
        assert_eq!(infer_column(&col(&["100", "n/a", "200"])), ColumnType::Text);
        assert_eq!(infer_column(&col(&["Acme", "Beta"])), ColumnType::Text);
    }

    #[test]
    fn test_empties_ignored() {
        assert_eq!(infer_column(&col(&["", "  ", "100"])), ColumnType::Number);
        // All-empty column falls back to text.
        assert_eq!(infer_column(&col(&["", ""])), ColumnType::Text);
    }

    #[test]
    fn test_numeric_cells_count_as_numbers() {
        let values = vec![CellValue::Number(5.0), CellValue::from("10")];
        assert_eq!(infer_column(&values), ColumnType::Number);
    }

    #[test]
    fn test_infer_table_per_column() {
        let table = TableContent {
            headers: vec!["Name".to_string(), "Revenue".to_string()],
            rows: vec![
                vec!["Acme".into(), "100".into()],
                vec!["Beta".into(), "200".into()],
            ],
            ..Default::default()
        };
        assert_eq!(infer_table(&table), vec![ColumnType::Text, ColumnType::Number]);
    }

    #[test]
    fn test_inference_is_idempotent_on_formatted_output() {
        let cases = [
            (col(&["1234.5", "99"]), ColumnType::Number),
            (col(&["$1,234.50", "$99"]), ColumnType::Currency),
            (col(&["12.5%", "99%"]), ColumnType::Percentage),
            (col(&["hello", "world"]), ColumnType::Text),
        ];
        for (values, expected) in cases {
            let inferred = infer_column(&values);
            assert_eq!(inferred, expected);
            let formatted: Vec<CellValue> = values
                .iter()
                .map(|v| CellValue::Text(format_value(v, inferred)))
                .collect();
            assert_eq!(infer_column(&formatted), expected);
        }
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_currency() {
        assert_eq!(
            parse_value("$1,234.50", ColumnType::Currency),
            CellValue::Number(1234.5)
        );
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_value("12.5%", ColumnType::Percentage), CellValue::Number(12.5));
    }

    #[test]
    fn test_parse_unparseable_falls_back_to_text() {
        assert_eq!(
            parse_value("n/a", ColumnType::Number),
            CellValue::Text("n/a".to_string())
        );
    }

    #[test]
    fn test_parse_text_column_never_parses() {
        assert_eq!(
            parse_value("100", ColumnType::Text),
            CellValue::Text("100".to_string())
        );
    }

    // ── Formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_currency_canonical() {
        assert_eq!(
            format_value(&CellValue::Number(1234.5), ColumnType::Currency),
            "$1,234.50"
        );
        assert_eq!(
            format_value(&CellValue::Number(99.0), ColumnType::Currency),
            "$99.00"
        );
    }

    #[test]
    fn test_format_number_grouping_and_fraction() {
        assert_eq!(
            format_value(&CellValue::Number(1234567.0), ColumnType::Number),
            "1,234,567"
        );
        assert_eq!(
            format_value(&CellValue::Number(1234.567), ColumnType::Number),
            "1,234.57"
        );
        assert_eq!(format_value(&CellValue::Number(12.5), ColumnType::Number), "12.5");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(
            format_value(&CellValue::Number(12.5), ColumnType::Percentage),
            "12.5%"
        );
    }

    #[test]
    fn test_format_reparses_text_cells() {
        assert_eq!(
            format_value(&CellValue::from("€1,234.5"), ColumnType::Currency),
            "$1,234.50"
        );
        // Symbol is fixed at render time, not preserved.
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(
            format_value(&CellValue::Number(-1234.5), ColumnType::Currency),
            "-$1,234.50"
        );
    }

    #[test]
    fn test_format_passes_unparseable_through() {
        assert_eq!(format_value(&CellValue::from("n/a"), ColumnType::Number), "n/a");
    }

    // ── Round trip ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_then_format_canonicalizes() {
        let parsed = parse_value("$1,234.50", ColumnType::Currency);
        assert_eq!(parsed, CellValue::Number(1234.5));
        assert_eq!(format_value(&parsed, ColumnType::Currency), "$1,234.50");
    }
}

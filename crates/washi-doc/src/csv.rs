//! CSV import for table blocks.
//!
//! A deliberately small parser: `"` toggles an in-quotes flag and commas
//! inside quotes do not split. The first row is treated as a header row
//! iff at least one of its cells fails to parse as a bare number;
//! otherwise synthetic `Column N` headers are generated and the first row
//! becomes data. Data rows are padded or truncated to the header width,
//! and column types are inferred fresh from the result.

use washi_types::{CellValue, TableContent};

use crate::columns;
use crate::error::{DocError, Result};

/// Split one CSV line on commas, honoring quotes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields.iter().map(|f| f.trim().to_string()).collect()
}

fn is_bare_number(s: &str) -> bool {
    !s.trim().is_empty() && s.trim().parse::<f64>().is_ok()
}

/// Parse a CSV document into table content.
///
/// Returns [`DocError::EmptyImport`] when the input has no usable rows;
/// callers treat that as a no-op on the existing table.
pub fn import(text: &str) -> Result<TableContent> {
    let mut rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect();
    if rows.is_empty() {
        return Err(DocError::EmptyImport);
    }

    let first_is_header = rows[0].iter().any(|cell| !is_bare_number(cell));
    let headers = if first_is_header {
        rows.remove(0)
    } else {
        (1..=rows[0].len()).map(|n| format!("Column {}", n)).collect()
    };
    if headers.is_empty() {
        return Err(DocError::EmptyImport);
    }

    let mut table = TableContent {
        headers,
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::Text).collect())
            .collect(),
        ..Default::default()
    };
    table.normalize();
    columns::reinfer(&mut table);
    Ok(table)
}

// ============================================================================
// Tests
// ============================================================================

//! Clipboard text: tab-separated values, one line per row.
//!
//! Values containing tabs, newlines or quotes are wrapped in quotes with
//! internal quotes doubled, the way spreadsheet applications exchange them.

use serde_json::Value;

use crate::types::{CalculatedColumn, CellRange, Row};

/// Plain text for a cell value: strings verbatim, null as empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape a cell value for TSV/clipboard format
pub fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Copy the cells of `range` as TSV. Rows or columns outside the slices
/// are skipped.
pub fn copy_range_text(rows: &[Row], columns: &[CalculatedColumn], range: CellRange) -> String {
    let first_row = usize::try_from(range.top_left.row_idx).unwrap_or(0);
    let last_row = usize::try_from(range.bottom_right.row_idx).unwrap_or(0);
    let columns = columns
        .get(range.top_left.idx..=range.bottom_right.idx.min(columns.len().saturating_sub(1)))
        .unwrap_or_default();

    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .skip(first_row)
        .take(last_row.saturating_sub(first_row) + 1)
        .map(|(_, row)| {
            columns
                .iter()
                .map(|column| {
                    let text = row.get(column.key()).map(value_to_text).unwrap_or_default();
                    escape_cell_value(&text)
                })
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect();
    lines.join("\n")
}

/// Split clipboard text into rows of fields, undoing [`escape_cell_value`].
///
/// A trailing newline does not produce an extra empty row.
pub fn parse_clipboard_text(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut pending = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        pending = true;
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            '\t' => {
                row.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                at_field_start = true;
                pending = false;
            }
            _ => {
                field.push(ch);
                at_field_start = false;
            }
        }
    }
    if pending {
        row.push(field);
        rows.push(row);
    }
    rows
}

//! Cell rendering and editing contracts.
//!
//! The grid core decides *which* cells exist and where they go; turning a
//! value into text and text back into a value is delegated to these traits.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::editor::value_to_text;
use crate::types::{CalculatedColumn, Row};

/// Everything a formatter or editor may look at for one cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub column: &'a CalculatedColumn,
    pub row: &'a Row,
    pub row_idx: usize,
}

impl<'a> CellContext<'a> {
    pub fn new(column: &'a CalculatedColumn, row: &'a Row, row_idx: usize) -> Self {
        Self {
            column,
            row,
            row_idx,
        }
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.row.get(self.column.key())
    }
}

/// Turns a cell value into display text.
pub trait Formatter {
    fn format(&self, ctx: &CellContext<'_>) -> String;
}

/// Strings verbatim, other JSON values in their JSON spelling, null as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(&self, ctx: &CellContext<'_>) -> String {
        ctx.value().map(value_to_text).unwrap_or_default()
    }
}

/// Edits a cell as text.
pub trait CellEditor {
    /// Text the editor starts with
    fn initial_text(&self, ctx: &CellContext<'_>) -> String;

    /// Value to commit for the edited text
    fn parse(&self, ctx: &CellContext<'_>, text: &str) -> Value;
}

/// Plain text input.
///
/// Detects the value type of the committed text:
/// - Empty string → null
/// - "true"/"false" (case-insensitive) → boolean
/// - Parseable as f64 → number
/// - Otherwise → string
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEditor;

impl CellEditor for TextEditor {
    fn initial_text(&self, ctx: &CellContext<'_>) -> String {
        DefaultFormatter.format(ctx)
    }

    fn parse(&self, _ctx: &CellContext<'_>, text: &str) -> Value {
        detect_value(text)
    }
}

pub(crate) fn detect_value(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(number) = trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
    {
        // Keep integers integral
        if let Ok(int) = trimmed.parse::<i64>() {
            return Value::Number(int.into());
        }
        return Value::Number(number);
    }
    Value::String(trimmed.to_string())
}

/// What to show when the grid has no rows.
pub trait EmptyRowsView {
    fn content(&self) -> String;
}

/// A fixed message as the empty view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyMessage(pub String);

impl EmptyRowsView for EmptyMessage {
    fn content(&self) -> String {
        self.0.clone()
    }
}

/// Data needed to render a single body cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRenderData {
    pub row_idx: usize,
    pub idx: usize,
    pub text: String,
    /// Content x of the cell's left edge
    pub left: f32,
    /// Content y of the cell's top edge, relative to the body
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub frozen: bool,
    pub active: bool,
    pub selected: bool,
}

//! Update coalescing: turns one user action (edit, paste, fill) into a
//! single [`RowsUpdateEvent`].
//!
//! The coalescer borrows the host's rows and never mutates them. Cells that
//! fail the editable check are skipped, and an action that writes nothing
//! produces no event at all.

mod clipboard;
mod fill;

use std::collections::BTreeMap;

use serde_json::Value;

pub use clipboard::{copy_range_text, escape_cell_value, parse_clipboard_text, value_to_text};
pub use fill::{paste_destination, tile_offset, Extent};

use crate::types::{
    CalculatedColumn, CellRange, Position, Row, RowPatch, RowsUpdateEvent, UpdateAction,
};

/// An open cell editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub position: Position,
    /// Value at the time the editor opened
    pub original: Value,
    /// Current draft value
    pub value: Value,
}

impl EditSession {
    pub fn new(position: Position, original: Value) -> Self {
        Self {
            position,
            value: original.clone(),
            original,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.value != self.original
    }
}

pub struct UpdateCoalescer<'a, F>
where
    F: Fn(usize, &CalculatedColumn) -> bool,
{
    columns: &'a [CalculatedColumn],
    rows: &'a [Row],
    is_editable: F,
}

impl<'a, F> UpdateCoalescer<'a, F>
where
    F: Fn(usize, &CalculatedColumn) -> bool,
{
    /// `is_editable` is the host's per-cell check; the column's own
    /// `editable` flag is always applied as well.
    pub fn new(columns: &'a [CalculatedColumn], rows: &'a [Row], is_editable: F) -> Self {
        Self {
            columns,
            rows,
            is_editable,
        }
    }

    fn extent(&self) -> Extent {
        Extent {
            column_count: self.columns.len(),
            row_count: self.rows.len(),
        }
    }

    /// Whether `(row_idx, idx)` accepts writes.
    pub fn can_write(&self, row_idx: usize, idx: usize) -> bool {
        row_idx < self.rows.len()
            && self
                .columns
                .get(idx)
                .is_some_and(|column| column.column.editable && (self.is_editable)(row_idx, column))
    }

    fn cell_value(&self, position: Position) -> Value {
        let row = position.data_row().and_then(|row| self.rows.get(row));
        let column = self.columns.get(position.idx);
        match (row, column) {
            (Some(row), Some(column)) => row.get(column.key()).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// A committed edit of a single cell.
    pub fn begin_edit(&self, position: Position, value: Value) -> Option<RowsUpdateEvent> {
        let cell = self.extent().clip(CellRange::single(position))?;
        self.collect(UpdateAction::CellUpdate, position, cell, cell, |_| {
            Some(value.clone())
        })
    }

    /// Paste the grid cells of `source` into `destination`, tiling the
    /// source when the destination is larger.
    pub fn apply_paste(
        &self,
        source: CellRange,
        destination: CellRange,
    ) -> Option<RowsUpdateEvent> {
        let extent = self.extent();
        let source = extent.clip(source)?;
        let destination =
            extent.clip(paste_destination(destination, source.width(), source.height()))?;
        let anchor = destination.top_left;
        self.collect(
            UpdateAction::Paste,
            anchor,
            source,
            destination,
            |target| Some(self.cell_value(Self::source_cell(source, anchor, target))),
        )
    }

    /// Paste clipboard text (TSV) into `destination`.
    pub fn apply_paste_text(&self, text: &str, destination: CellRange) -> Option<RowsUpdateEvent> {
        let block = parse_clipboard_text(text);
        let height = block.len();
        let width = block.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        let destination = self
            .extent()
            .clip(paste_destination(destination, width, height))?;
        let anchor = destination.top_left;
        // The pasted block sits at the anchor
        let source = CellRange {
            top_left: anchor,
            bottom_right: Position::new(
                anchor.idx + width - 1,
                anchor.row_idx + isize::try_from(height - 1).ok()?,
            ),
        };
        self.collect(UpdateAction::Paste, anchor, source, destination, |target| {
            let (col, row) = tile_offset(anchor, target, width, height);
            let text = block.get(row).and_then(|fields| fields.get(col));
            Some(text.map_or(Value::Null, |text| Value::String(text.clone())))
        })
    }

    /// Fill handle dragged from `source` over `destination`. Cells already
    /// in the source are left alone.
    pub fn apply_fill_drag(
        &self,
        source: CellRange,
        destination: CellRange,
    ) -> Option<RowsUpdateEvent> {
        let extent = self.extent();
        let source = extent.clip(source)?;
        let destination = extent.clip(destination)?;
        let anchor = source.top_left;
        self.collect(
            UpdateAction::CellDrag,
            anchor,
            source,
            destination,
            |target| {
                (!source.contains(target))
                    .then(|| self.cell_value(Self::source_cell(source, anchor, target)))
            },
        )
    }

    /// Fill handle double-clicked: copy `source_cell` down to the last row.
    pub fn apply_fill_down(&self, source_cell: Position) -> Option<RowsUpdateEvent> {
        let source = self.extent().clip(CellRange::single(source_cell))?;
        let last_row = isize::try_from(self.rows.len().checked_sub(1)?).ok()?;
        if source_cell.row_idx >= last_row {
            return None;
        }
        let destination = CellRange {
            top_left: Position::new(source_cell.idx, source_cell.row_idx + 1),
            bottom_right: Position::new(source_cell.idx, last_row),
        };
        let value = self.cell_value(source_cell);
        self.collect(
            UpdateAction::ColumnFill,
            source_cell,
            source,
            destination,
            |_| Some(value.clone()),
        )
    }

    fn source_cell(source: CellRange, anchor: Position, target: Position) -> Position {
        let (col, row) = tile_offset(anchor, target, source.width(), source.height());
        Position::new(
            source.top_left.idx + col,
            source.top_left.row_idx + isize::try_from(row).unwrap_or(0),
        )
    }

    fn collect(
        &self,
        action: UpdateAction,
        from_cell: Position,
        source: CellRange,
        destination: CellRange,
        mut value_for: impl FnMut(Position) -> Option<Value>,
    ) -> Option<RowsUpdateEvent> {
        let mut patches: BTreeMap<usize, Row> = BTreeMap::new();
        let mut skipped = 0usize;
        for row_idx in destination.top_left.row_idx..=destination.bottom_right.row_idx {
            let Ok(row) = usize::try_from(row_idx) else {
                continue;
            };
            for idx in destination.top_left.idx..=destination.bottom_right.idx {
                let Some(column) = self.columns.get(idx) else {
                    continue;
                };
                if !self.can_write(row, idx) {
                    skipped += 1;
                    continue;
                }
                if let Some(value) = value_for(Position::new(idx, row_idx)) {
                    patches
                        .entry(row)
                        .or_default()
                        .insert(column.key().to_string(), value);
                }
            }
        }
        if skipped > 0 {
            log::debug!("{action:?}: skipped {skipped} read-only cells");
        }

        let from_row = *patches.keys().next()?;
        let to_row = *patches.keys().next_back()?;
        Some(RowsUpdateEvent {
            action,
            from_cell,
            source,
            destination,
            from_row,
            to_row,
            patches: patches
                .into_iter()
                .map(|(row_idx, updated)| RowPatch { row_idx, updated })
                .collect(),
        })
    }
}

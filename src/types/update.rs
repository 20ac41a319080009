use serde::Serialize;

use super::{CellRange, Position};

/// A row record, keyed by column key.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// The user action an update event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateAction {
    /// Direct edit of a single cell
    CellUpdate,
    /// Clipboard paste
    Paste,
    /// Fill handle dragged over a range
    CellDrag,
    /// Fill handle double-clicked, fill to the last row
    ColumnFill,
}

/// Changed values for one row; only the touched keys are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPatch {
    pub row_idx: usize,
    pub updated: Row,
}

/// One coalesced mutation request, consumed once by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsUpdateEvent {
    pub action: UpdateAction,
    /// Cell the action started from (edited cell, paste target, fill source)
    pub from_cell: Position,
    pub source: CellRange,
    pub destination: CellRange,
    /// First row touched by a patch
    pub from_row: usize,
    /// Last row touched by a patch
    pub to_row: usize,
    /// Patches in ascending row order
    pub patches: Vec<RowPatch>,
}

impl RowsUpdateEvent {
    /// Value written to `(row_idx, key)`, if this event touches that cell.
    pub fn value_at(&self, row_idx: usize, key: &str) -> Option<&serde_json::Value> {
        self.patches
            .iter()
            .find(|patch| patch.row_idx == row_idx)
            .and_then(|patch| patch.updated.get(key))
    }

    /// Number of cells written by this event.
    pub fn cell_count(&self) -> usize {
        self.patches.iter().map(|patch| patch.updated.len()).sum()
    }

    /// Apply the patches to a row slice owned by the host.
    ///
    /// Patches for rows past the end of `rows` are ignored.
    pub fn apply_to(&self, rows: &mut [Row]) {
        for patch in &self.patches {
            if let Some(row) = rows.get_mut(patch.row_idx) {
                for (key, value) in &patch.updated {
                    row.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

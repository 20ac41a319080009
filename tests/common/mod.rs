//! Common test utilities: grid builders and a host that records callbacks.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::{BTreeMap, HashSet};

use serde_json::{json, Value};
use vgrid::layout::ScrollPosition;
use vgrid::{
    CalculatedColumn, Column, GridConfig, GridHost, Position, Row, RowsUpdateEvent,
    SelectedRange, SortColumn, ViewportController,
};

// ============================================================================
// Recording host
// ============================================================================

/// One host callback, as observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Cell(Position),
    Range(SelectedRange),
    Cleared,
    Scroll(ScrollPosition),
    Sort(Option<SortColumn>),
    Filters(BTreeMap<String, String>),
    ColumnResize(usize, f32),
    Copy(String),
}

/// Host that records every callback and refuses the cells in `read_only`.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    pub updates: Vec<RowsUpdateEvent>,
    /// `(row_idx, column key)` pairs that refuse selection and writes
    pub read_only: HashSet<(usize, String)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_only(cells: &[(usize, &str)]) -> Self {
        Self {
            read_only: cells
                .iter()
                .map(|(row, key)| (*row, (*key).to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Selection callbacks only, in order.
    pub fn selection_events(&self) -> Vec<HostEvent> {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    HostEvent::Cell(_) | HostEvent::Range(_) | HostEvent::Cleared
                )
            })
            .cloned()
            .collect()
    }

    pub fn scroll_events(&self) -> Vec<ScrollPosition> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Scroll(scroll) => Some(*scroll),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.updates.clear();
    }
}

impl GridHost for RecordingHost {
    fn is_cell_editable(&self, row_idx: usize, column: &CalculatedColumn) -> bool {
        !self
            .read_only
            .contains(&(row_idx, column.key().to_string()))
    }

    fn on_selected_cell_change(&mut self, position: Position) {
        self.events.push(HostEvent::Cell(position));
    }

    fn on_selected_cell_range_change(&mut self, range: SelectedRange) {
        self.events.push(HostEvent::Range(range));
    }

    fn on_selection_cleared(&mut self) {
        self.events.push(HostEvent::Cleared);
    }

    fn on_scroll(&mut self, scroll: ScrollPosition) {
        self.events.push(HostEvent::Scroll(scroll));
    }

    fn on_rows_update(&mut self, event: RowsUpdateEvent) {
        self.updates.push(event);
    }

    fn on_sort_change(&mut self, sort: Option<SortColumn>) {
        self.events.push(HostEvent::Sort(sort));
    }

    fn on_filters_change(&mut self, filters: &BTreeMap<String, String>) {
        self.events.push(HostEvent::Filters(filters.clone()));
    }

    fn on_column_resize(&mut self, original_idx: usize, width: f32) {
        self.events.push(HostEvent::ColumnResize(original_idx, width));
    }

    fn on_copy(&mut self, text: String) {
        self.events.push(HostEvent::Copy(text));
    }
}

// ============================================================================
// Builders
// ============================================================================

/// `count` columns named `c0..`, each `width` pixels wide.
pub fn fixed_columns(count: usize, width: f32) -> Vec<Column> {
    (0..count)
        .map(|i| Column::new(format!("c{i}")).with_width(width))
        .collect()
}

/// Rows where cell `(row, cN)` holds the string `"rRcN"`.
pub fn text_rows(row_count: usize, column_count: usize) -> Vec<Row> {
    (0..row_count)
        .map(|r| {
            (0..column_count)
                .map(|c| (format!("c{c}"), json!(format!("r{r}c{c}"))))
                .collect()
        })
        .collect()
}

/// Rows holding one string per cell, by column key `c0..`.
pub fn rows_from(values: &[&[&str]]) -> Vec<Row> {
    values
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(c, value)| (format!("c{c}"), Value::String((*value).to_string())))
                .collect()
        })
        .collect()
}

/// A measured grid: `column_count` 100px columns, `row_count` 35px rows,
/// a 400x385 viewport (35px header, 350px body).
pub fn grid(
    column_count: usize,
    row_count: usize,
    host: RecordingHost,
) -> ViewportController<RecordingHost> {
    let mut controller = ViewportController::new(GridConfig::default(), host);
    controller.set_columns(fixed_columns(column_count, 100.0));
    controller.set_row_count(row_count);
    controller.resize(400.0, 385.0);
    controller.host_mut().clear();
    controller
}

/// Viewport point at the center of body cell `(idx, row_idx)`, assuming
/// 100px columns, 35px rows and no scroll.
pub fn cell_center(idx: usize, row_idx: usize) -> (f32, f32) {
    #[allow(clippy::cast_precision_loss)]
    let (x, y) = (idx as f32 * 100.0 + 50.0, 35.0 + row_idx as f32 * 35.0 + 17.0);
    (x, y)
}

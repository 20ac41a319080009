//! Viewport controller - the single owner of grid state.
//!
//! `ViewportController` holds scroll position, container size, columns, row
//! counts, width overrides, sort/filter state, the open editor and the
//! selection machine. Every mutation goes through its methods; derived layout
//! (column metrics, row offsets, viewport columns) is memoized on the inputs
//! it depends on and handed out as `Arc`s.
//!
//! The host owns the row data and observes the grid through [`GridHost`].
//! On wasm32, [`DataGrid`] wraps the controller for JavaScript.

mod events;
mod handle;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use events::HitTarget;
pub use handle::GridHandle;
#[cfg(target_arch = "wasm32")]
pub use wasm::DataGrid;

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::config::GridConfig;
use crate::editor::EditSession;
use crate::error::{GridError, Result};
use crate::layout::{
    column_min_width, compute_metrics, horizontal_range, vertical_range, viewport_columns,
    ColumnMetrics, ColumnRange, Memo, RowHeights, RowOffsets, RowRange, ScrollPosition,
    Viewport, WidthOverrides,
};
use crate::render::{
    selection_rects, CellContext, CellEditor, CellRenderData, DefaultFormatter, EmptyRowsView,
    Formatter, SelectionRect, TextEditor,
};
use crate::selection::{GridBounds, SelectionState, SelectionStateMachine, Transition};
use crate::types::{
    next_sort, CalculatedColumn, CellRange, Column, Position, Row, RowsUpdateEvent,
    SelectedRange, SortColumn,
};

/// Callbacks from the grid to its host. Every method has a no-op default.
pub trait GridHost {
    /// Per-cell check consulted before selecting or writing a data cell.
    fn is_cell_editable(&self, _row_idx: usize, _column: &CalculatedColumn) -> bool {
        true
    }

    fn on_selected_cell_change(&mut self, _position: Position) {}

    fn on_selected_cell_range_change(&mut self, _range: SelectedRange) {}

    fn on_selection_cleared(&mut self) {}

    fn on_scroll(&mut self, _scroll: ScrollPosition) {}

    /// One coalesced mutation request; the host applies it to its rows.
    fn on_rows_update(&mut self, _event: RowsUpdateEvent) {}

    fn on_sort_change(&mut self, _sort: Option<SortColumn>) {}

    fn on_filters_change(&mut self, _filters: &BTreeMap<String, String>) {}

    /// A column was resized; `original_idx` is its index in the host's column list
    fn on_column_resize(&mut self, _original_idx: usize, _width: f32) {}

    /// Clipboard text for the current selection
    fn on_copy(&mut self, _text: String) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl GridHost for NoopHost {}

/// What the renderer draws for body rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportSnapshot {
    /// Frozen columns first, then the visible scrollable range
    pub viewport_columns: Arc<Vec<usize>>,
    pub column_range: Option<ColumnRange>,
    /// `None` when there are no rows
    pub row_range: Option<RowRange>,
    pub scroll: ScrollPosition,
    /// Always the body's `scroll_left`
    pub header_scroll_left: f32,
    pub total_width: f32,
    /// Height of all body rows
    pub total_height: f32,
    pub header_height: f32,
    pub body_height: f32,
    pub summary_rows_height: f32,
}

/// What the renderer draws when there are no rows and an empty view is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptySnapshot {
    pub content: String,
    pub viewport_columns: Arc<Vec<usize>>,
    pub total_width: f32,
    pub header_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderPlan {
    /// Container width not known yet; render nothing
    Unmeasured,
    Empty(EmptySnapshot),
    Rows(ViewportSnapshot),
}

/// Inputs column metrics depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MetricsKey {
    columns_revision: u64,
    overrides_revision: u64,
    viewport_width: f32,
    min_column_width: f32,
}

/// Fill handle drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FillDrag {
    pub(crate) source: CellRange,
    pub(crate) destination: CellRange,
}

pub struct ViewportController<H: GridHost> {
    host: H,
    config: GridConfig,
    viewport: Viewport,

    columns: Vec<Column>,
    columns_revision: u64,
    width_overrides: WidthOverrides,
    overrides_revision: u64,

    row_count: usize,
    summary_row_count: usize,
    custom_row_heights: Option<Vec<f32>>,
    heights_revision: u64,

    metrics_memo: Memo<MetricsKey, Arc<ColumnMetrics>>,
    heights_memo: Memo<(u64, f32), Arc<RowHeights>>,
    viewport_columns_memo: Memo<(MetricsKey, Option<ColumnRange>), Arc<Vec<usize>>>,

    selection: SelectionStateMachine,
    editor: Option<EditSession>,
    fill_drag: Option<FillDrag>,
    copied_range: Option<CellRange>,
    sort: Option<SortColumn>,
    filters: BTreeMap<String, String>,

    formatter: Box<dyn Formatter>,
    cell_editor: Box<dyn CellEditor>,
    empty_rows_view: Option<Box<dyn EmptyRowsView>>,
}

impl<H: GridHost> ViewportController<H> {
    pub fn new(config: GridConfig, host: H) -> Self {
        let selection = SelectionStateMachine::new(config.cell_navigation_mode);
        Self {
            host,
            config,
            viewport: Viewport::new(),
            columns: Vec::new(),
            columns_revision: 0,
            width_overrides: WidthOverrides::new(),
            overrides_revision: 0,
            row_count: 0,
            summary_row_count: 0,
            custom_row_heights: None,
            heights_revision: 0,
            metrics_memo: Memo::new(),
            heights_memo: Memo::new(),
            viewport_columns_memo: Memo::new(),
            selection,
            editor: None,
            fill_drag: None,
            copied_range: None,
            sort: None,
            filters: BTreeMap::new(),
            formatter: Box::new(DefaultFormatter),
            cell_editor: Box::new(TextEditor),
            empty_rows_view: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn set_formatter(&mut self, formatter: Box<dyn Formatter>) {
        self.formatter = formatter;
    }

    pub fn set_cell_editor(&mut self, cell_editor: Box<dyn CellEditor>) {
        self.cell_editor = cell_editor;
    }

    /// View shown instead of rows when the grid has none.
    pub fn set_empty_rows_view(&mut self, view: Option<Box<dyn EmptyRowsView>>) {
        self.empty_rows_view = view;
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.selection.set_mode(config.cell_navigation_mode);
        self.config = config;
        self.after_shape_change();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Replace the column list. Metrics are recomputed on next use.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.columns_revision += 1;
        self.after_shape_change();
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn set_row_count(&mut self, row_count: usize) {
        if row_count != self.row_count {
            self.row_count = row_count;
            self.after_shape_change();
        }
    }

    pub fn summary_row_count(&self) -> usize {
        self.summary_row_count
    }

    /// Summary rows are pinned below the body and never virtualized.
    pub fn set_summary_row_count(&mut self, count: usize) {
        self.summary_row_count = count;
        self.clamp_scroll();
    }

    /// Per-row heights, or `None` for the configured fixed row height.
    pub fn set_row_heights(&mut self, heights: Option<Vec<f32>>) {
        self.custom_row_heights = heights;
        self.heights_revision += 1;
        self.clamp_scroll();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Container resized (from the resize observer).
    pub fn resize(&mut self, width: f32, height: f32) {
        let was_measured = self.viewport.is_measured();
        self.viewport.resize(width, height);
        if !was_measured && self.viewport.is_measured() {
            debug!("viewport measured: {width}x{height}");
        }
        self.clamp_scroll();
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn sort(&self) -> Option<&SortColumn> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn width_overrides(&self) -> &WidthOverrides {
        &self.width_overrides
    }

    fn metrics_key(&self) -> MetricsKey {
        MetricsKey {
            columns_revision: self.columns_revision,
            overrides_revision: self.overrides_revision,
            viewport_width: self.viewport.width,
            min_column_width: self.config.min_column_width,
        }
    }

    /// Column metrics for the current inputs. Before the first measurement
    /// every column sits at its minimum width.
    pub fn metrics(&mut self) -> Arc<ColumnMetrics> {
        let key = self.metrics_key();
        let columns = &self.columns;
        let overrides = &self.width_overrides;
        self.metrics_memo.get_or_compute(key, |key| {
            let metrics =
                compute_metrics(columns, key.min_column_width, key.viewport_width, overrides)
                    .unwrap_or_else(|| ColumnMetrics::unmeasured(columns, key.min_column_width));
            Arc::new(metrics)
        })
    }

    /// Number of times column metrics were computed.
    pub fn metrics_computations(&self) -> u64 {
        self.metrics_memo.computations()
    }

    pub fn row_heights(&mut self) -> Arc<RowHeights> {
        let key = (self.heights_revision, self.config.row_height);
        let custom = &self.custom_row_heights;
        self.heights_memo.get_or_compute(key, |&(_, row_height)| {
            Arc::new(match custom {
                Some(heights) => RowHeights::Variable(RowOffsets::from_heights(heights)),
                None => RowHeights::Fixed(row_height),
            })
        })
    }

    pub fn header_height(&self) -> f32 {
        self.config.header_height()
    }

    pub fn summary_rows_height(&self) -> f32 {
        crate::layout::index_to_f32(self.summary_row_count) * self.config.summary_row_height()
    }

    /// Height of the scrollable body window.
    pub fn body_height(&self) -> f32 {
        (self.viewport.height - self.header_height() - self.summary_rows_height()).max(0.0)
    }

    /// Rows moved by PageUp/PageDown: fully visible rows minus one.
    pub fn page_size(&mut self) -> usize {
        let visible = self.row_heights().fully_visible_rows(
            self.row_count,
            self.viewport.scroll_top,
            self.body_height(),
        );
        visible.saturating_sub(1).max(1)
    }

    pub fn grid_bounds(&mut self) -> GridBounds {
        let column_count = self.metrics().len();
        GridBounds::new(column_count, self.row_count).with_page_size(self.page_size())
    }

    /// Everything the renderer needs for the current frame.
    pub fn render_plan(&mut self) -> RenderPlan {
        if !self.viewport.is_measured() {
            return RenderPlan::Unmeasured;
        }
        let key = self.metrics_key();
        let metrics = self.metrics();
        let column_range = horizontal_range(
            &metrics,
            self.viewport.scroll_left,
            self.config.column_overscan,
        );
        let columns = self
            .viewport_columns_memo
            .get_or_compute((key, column_range), |(_, range)| {
                Arc::new(viewport_columns(&metrics, *range))
            });
        let header_height = self.header_height();

        if self.row_count == 0 {
            if let Some(view) = &self.empty_rows_view {
                return RenderPlan::Empty(EmptySnapshot {
                    content: view.content(),
                    viewport_columns: columns,
                    total_width: metrics.total_width,
                    header_height,
                });
            }
        }

        let heights = self.row_heights();
        let body_height = self.body_height();
        let row_range = vertical_range(
            &heights,
            self.row_count,
            self.viewport.scroll_top,
            body_height,
            self.config.row_overscan,
        );
        RenderPlan::Rows(ViewportSnapshot {
            viewport_columns: columns,
            column_range,
            row_range,
            scroll: self.viewport.scroll_position(),
            header_scroll_left: self.viewport.scroll_left,
            total_width: metrics.total_width,
            total_height: heights.total_height(self.row_count),
            header_height,
            body_height,
            summary_rows_height: self.summary_rows_height(),
        })
    }

    /// Formatted body cells of the current render plan.
    pub fn visible_cells(&mut self, rows: &[Row]) -> Vec<CellRenderData> {
        let RenderPlan::Rows(snapshot) = self.render_plan() else {
            return Vec::new();
        };
        let Some(row_range) = snapshot.row_range else {
            return Vec::new();
        };
        let metrics = self.metrics();
        let heights = self.row_heights();
        let state = self.selection.state();
        let active = state.active_position();
        let selected = state.cell_range();

        let mut cells = Vec::with_capacity(row_range.count() * snapshot.viewport_columns.len());
        for row_idx in row_range.iter() {
            let Some(row) = rows.get(row_idx) else {
                continue;
            };
            let position_row = isize::try_from(row_idx).unwrap_or(isize::MAX);
            for &idx in snapshot.viewport_columns.iter() {
                let Some(column) = metrics.get(idx) else {
                    continue;
                };
                let position = Position::new(idx, position_row);
                cells.push(CellRenderData {
                    row_idx,
                    idx,
                    text: self.formatter.format(&CellContext::new(column, row, row_idx)),
                    left: column.left,
                    top: heights.row_top(row_idx),
                    width: column.width,
                    height: heights.row_height(row_idx),
                    frozen: column.is_frozen(),
                    active: active == Some(position),
                    selected: selected.is_some_and(|range| range.contains(position)),
                });
            }
        }
        cells
    }

    /// Outline rectangles of the current selection, in viewport pixels.
    pub fn selection_overlay(&mut self) -> Vec<SelectionRect> {
        let Some(range) = self.selection.state().cell_range() else {
            return Vec::new();
        };
        let metrics = self.metrics();
        let heights = self.row_heights();
        selection_rects(range, &metrics, &heights, &self.viewport, self.header_height())
    }

    /// Advance the sort state of a sortable column. Returns false for
    /// columns that do not sort.
    pub fn toggle_sort(&mut self, idx: usize) -> bool {
        let metrics = self.metrics();
        let Some(column) = metrics.get(idx).filter(|c| c.column.sortable) else {
            return false;
        };
        self.sort = next_sort(self.sort.as_ref(), &column.column);
        debug!("sort changed: {:?}", self.sort);
        self.host.on_sort_change(self.sort.clone());
        true
    }

    /// Set the filter text of a column; an empty value clears it.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] when no column has `key`.
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.columns.iter().any(|column| column.key == key) {
            return Err(GridError::UnknownColumn(key.to_string()));
        }
        let changed = if value.is_empty() {
            self.filters.remove(key).is_some()
        } else {
            self.filters.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.host.on_filters_change(&self.filters);
        }
        Ok(())
    }

    /// Resize a column, clamped to its minimum width. Returns false for
    /// columns that are not resizable.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] for an index past the last column.
    pub fn resize_column(&mut self, idx: usize, width: f32) -> Result<bool> {
        let metrics = self.metrics();
        let column = metrics
            .get(idx)
            .ok_or_else(|| GridError::UnknownColumn(format!("#{idx}")))?;
        if !column.column.resizable || !width.is_finite() {
            return Ok(false);
        }
        let width = width.max(column_min_width(&column.column, self.config.min_column_width));
        let original_idx = column.original_idx;
        self.width_overrides.insert(column.key().to_string(), width);
        self.overrides_revision += 1;
        self.host.on_column_resize(original_idx, width);
        self.clamp_scroll();
        Ok(true)
    }

    /// Report a transition to the host and bring its target into view.
    pub(crate) fn apply_transition(&mut self, transition: Transition) {
        self.report_transition(transition);
        if let Some(target) = transition.scroll_target() {
            self.scroll_into_view(target);
        }
    }

    /// Report a transition to the host without scrolling.
    pub(crate) fn report_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Unchanged => {}
            Transition::Cell(position) => self.host.on_selected_cell_change(position),
            Transition::Range(range) => self.host.on_selected_cell_range_change(range),
            Transition::Cleared => self.host.on_selection_cleared(),
        }
    }

    /// Keep selection, editor and scroll valid after the grid shape changed.
    fn after_shape_change(&mut self) {
        let bounds = self.grid_bounds();
        let transition = self.selection.clamp_to(bounds);
        if self
            .editor
            .as_ref()
            .is_some_and(|session| !bounds.contains_cell(session.position))
        {
            self.editor = None;
        }
        if self.fill_drag.is_some() && transition.is_changed() {
            self.fill_drag = None;
        }
        if transition.is_changed() {
            self.host.on_selection_cleared();
        }
        self.clamp_scroll();
    }
}

/// Acceptance check for the selection machine: header cells always pass,
/// data cells ask the host.
pub(crate) fn editable_check<'a, H: GridHost>(
    metrics: &'a ColumnMetrics,
    host: &'a H,
) -> impl Fn(Position) -> bool + 'a {
    move |position: Position| match position.data_row() {
        None => true,
        Some(row) => metrics
            .get(position.idx)
            .is_some_and(|column| host.is_cell_editable(row, column)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::render::EmptyMessage;

    fn controller(columns: usize, rows: usize) -> ViewportController<NoopHost> {
        let mut controller = ViewportController::new(GridConfig::default(), NoopHost);
        controller.set_columns(
            (0..columns)
                .map(|i| Column::new(format!("c{i}")).with_width(100.0))
                .collect(),
        );
        controller.set_row_count(rows);
        controller
    }

    #[test]
    fn test_unmeasured_renders_nothing() {
        let mut controller = controller(10, 100);
        assert_eq!(controller.render_plan(), RenderPlan::Unmeasured);
        // Geometry queries still work with minimum widths
        assert_eq!(controller.metrics().total_width, 1000.0);
    }

    #[test]
    fn test_initial_plan() {
        let mut controller = controller(10, 100);
        controller.resize(300.0, 400.0);
        let RenderPlan::Rows(snapshot) = controller.render_plan() else {
            panic!("expected rows");
        };
        assert_eq!(*snapshot.viewport_columns, vec![0, 1, 2, 3]);
        assert_eq!(snapshot.header_height, 35.0);
        assert_eq!(snapshot.body_height, 365.0);
        assert_eq!(snapshot.total_height, 3500.0);
        assert_eq!(snapshot.row_range, Some(RowRange { start: 0, end: 12 }));
    }

    #[test]
    fn test_empty_view() {
        let mut controller = controller(3, 0);
        controller.resize(300.0, 400.0);
        assert!(matches!(controller.render_plan(), RenderPlan::Rows(_)));

        controller.set_empty_rows_view(Some(Box::new(EmptyMessage("No rows".into()))));
        let RenderPlan::Empty(snapshot) = controller.render_plan() else {
            panic!("expected empty view");
        };
        assert_eq!(snapshot.content, "No rows");
        assert_eq!(*snapshot.viewport_columns, vec![0, 1, 2]);
    }

    #[test]
    fn test_metrics_memoized_until_input_changes() {
        let mut controller = controller(5, 10);
        controller.resize(300.0, 400.0);
        let a = controller.metrics();
        let b = controller.metrics();
        assert!(Arc::ptr_eq(&a, &b));

        controller.resize(300.0, 200.0);
        assert!(Arc::ptr_eq(&a, &controller.metrics()));

        controller.resize(500.0, 200.0);
        assert!(!Arc::ptr_eq(&a, &controller.metrics()));
    }

    #[test]
    fn test_header_height_with_filters() {
        let mut config = GridConfig::default();
        config.enable_header_filters = true;
        let mut controller = ViewportController::new(config, NoopHost);
        controller.resize(300.0, 400.0);
        controller.set_summary_row_count(2);
        assert_eq!(controller.header_height(), 80.0);
        assert_eq!(controller.body_height(), 400.0 - 80.0 - 70.0);
    }

    #[test]
    fn test_resize_column_respects_minimum_and_flag() {
        let mut controller = ViewportController::new(GridConfig::default(), NoopHost);
        let mut fixed = Column::new("fixed").with_width(100.0);
        fixed.resizable = false;
        controller.set_columns(vec![Column::new("a").with_width(100.0), fixed]);
        controller.resize(600.0, 400.0);

        assert!(controller.resize_column(0, 20.0).unwrap());
        assert_eq!(controller.metrics().columns[0].width, 80.0);
        assert!(!controller.resize_column(1, 300.0).unwrap());
        assert!(controller.resize_column(5, 300.0).is_err());
    }

    #[test]
    fn test_sort_and_filters() {
        let mut controller = ViewportController::new(GridConfig::default(), NoopHost);
        controller.set_columns(vec![Column::new("a").sortable(), Column::new("b")]);
        assert!(controller.toggle_sort(0));
        assert_eq!(controller.sort().map(|s| s.column_key.as_str()), Some("a"));
        assert!(!controller.toggle_sort(1));

        controller.set_filter("b", "x").unwrap();
        assert_eq!(controller.filters().get("b").map(String::as_str), Some("x"));
        controller.set_filter("b", "").unwrap();
        assert!(controller.filters().is_empty());
        assert!(controller.set_filter("zzz", "x").is_err());
    }
}

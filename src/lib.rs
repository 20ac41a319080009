//! vgrid - virtualized data grid engine for the web
//!
//! Computes everything a data grid needs to render only what is on screen:
//! - Column widths, offsets and frozen columns from declarative column specs
//! - Visible column and row ranges with overscan, via binary search
//! - Cell and range selection driven by pointer and keyboard
//! - Edits, pastes and fill-handle drags coalesced into one update per action
//! - Memoized layout, rebuilt only when its inputs change
//!
//! The host owns the rows; the grid reports mutations through [`GridHost`].
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DataGrid } from 'vgrid';
//! await init();
//! const grid = new DataGrid(container, { rowHeight: 35 });
//! grid.setColumns([{ key: 'id', width: 80, frozen: true }, { key: 'title' }]);
//! grid.setRows(rows);
//! grid.on('rowsUpdate', (event) => { applyUpdate(event); grid.setRows(rows); });
//! const plan = grid.renderPlan();
//! ```
//!
//! # Usage (Rust)
//!
//! ```
//! use vgrid::{Column, GridConfig, NoopHost, RenderPlan, ViewportController};
//!
//! let mut grid = ViewportController::new(GridConfig::default(), NoopHost);
//! grid.set_columns(vec![Column::new("id").with_width(80.0), Column::new("title")]);
//! grid.set_row_count(1_000);
//! grid.resize(400.0, 300.0);
//! let RenderPlan::Rows(snapshot) = grid.render_plan() else {
//!     unreachable!()
//! };
//! assert_eq!(*snapshot.viewport_columns, vec![0, 1]);
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod layout;
pub mod render;
pub mod selection;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use editor::{EditSession, UpdateCoalescer};
pub use error::{GridError, Result};
pub use layout::{ColumnMetrics, ColumnRange, RowRange, ScrollPosition};
pub use selection::{CellNavigationMode, SelectionState, SelectionStateMachine};
#[cfg(target_arch = "wasm32")]
pub use viewer::DataGrid;
pub use viewer::{
    EmptySnapshot, GridHandle, GridHost, HitTarget, NoopHost, RenderPlan, ViewportController,
    ViewportSnapshot,
};

pub use types::*;

/// Compute column metrics for a JSON column list at a given viewport width.
///
/// # Errors
/// Returns an error if the column JSON is invalid.
#[wasm_bindgen]
pub fn column_metrics_json(
    columns: &str,
    viewport_width: f32,
    min_column_width: f32,
) -> std::result::Result<String, JsValue> {
    let columns: Vec<Column> =
        serde_json::from_str(columns).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let metrics = layout::compute_metrics(
        &columns,
        min_column_width,
        viewport_width,
        &layout::WidthOverrides::new(),
    )
    .unwrap_or_else(|| ColumnMetrics::unmeasured(&columns, min_column_width));

    serde_json::to_string(&metrics)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

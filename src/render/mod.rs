//! Renderer boundary.
//!
//! This module provides:
//! - Formatter/editor capability traits with text defaults
//! - The empty-rows view contract
//! - Per-cell render data and selection overlay geometry

pub mod cell;
pub mod selection;

pub use cell::{
    CellContext, CellEditor, CellRenderData, DefaultFormatter, EmptyMessage, EmptyRowsView,
    Formatter, TextEditor,
};
pub use selection::{
    fill_handle_center, hits_fill_handle, selection_rects, SelectionRect, FILL_HANDLE_SIZE,
};

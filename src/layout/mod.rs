//! Layout engine for column geometry and viewport virtualization.
//!
//! This module handles:
//! - Resolving column widths, offsets and the frozen prefix
//! - Row offsets for fixed and variable row heights
//! - Binary search for the visible column/row range plus overscan
//! - Viewport scroll state and scroll-into-view
//! - Memoizing derived layout state keyed on its inputs

mod column_metrics;
mod memo;
mod range;
mod rows;
mod viewport;

pub use column_metrics::{compute_metrics, ColumnMetrics, WidthOverrides};
pub(crate) use column_metrics::column_min_width;
pub use memo::Memo;
pub use range::{horizontal_range, vertical_range, viewport_columns, ColumnRange, RowRange};
pub use rows::{RowHeights, RowOffsets};
pub use viewport::{ScrollBounds, ScrollPosition, Viewport};

pub(crate) use rows::{f32_to_index, index_to_f32};

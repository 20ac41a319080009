//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on DOM APIs.
//! Coordinates are viewport pixels: x from the container's left edge, y from
//! its top edge (header included).

use serde::Serialize;

use crate::layout::{ColumnMetrics, RowHeights, Viewport};
use crate::types::CellRange;

/// Side length of the fill handle square in pixels
pub const FILL_HANDLE_SIZE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Outline rectangles for a selected range: one for the frozen part and one
/// for the scrolling part, joined without a border where they meet.
pub fn selection_rects(
    range: CellRange,
    metrics: &ColumnMetrics,
    heights: &RowHeights,
    viewport: &Viewport,
    header_height: f32,
) -> Vec<SelectionRect> {
    let (Some(min_row), Some(max_row)) = (range.top_left.data_row(), range.bottom_right.data_row())
    else {
        return Vec::new();
    };
    let min_col = range.top_left.idx;
    let max_col = range.bottom_right.idx.min(metrics.len().saturating_sub(1));
    if metrics.is_empty() || min_col > max_col {
        return Vec::new();
    }

    let y = header_height + heights.row_top(min_row) - viewport.scroll_top;
    let h = heights.row_top(max_row) + heights.row_height(max_row) - heights.row_top(min_row);

    let first_unfrozen = metrics.first_unfrozen_idx();
    let frozen_span = metrics
        .last_frozen_idx
        .filter(|&last| min_col <= last)
        .map(|last| (min_col, max_col.min(last)));
    let scroll_span = (max_col >= first_unfrozen).then(|| (min_col.max(first_unfrozen), max_col));

    let mut rects = Vec::with_capacity(2);
    let mut push_rect = |(start, end): (usize, usize), frozen: bool| {
        let (Some(first), Some(last)) = (metrics.get(start), metrics.get(end)) else {
            return;
        };
        let offset = if frozen { 0.0 } else { viewport.scroll_left };
        rects.push(SelectionRect {
            x: first.left - offset,
            y,
            w: last.right() - first.left,
            h,
            draw_left: start == min_col,
            draw_right: end == max_col,
        });
    };
    if let Some(span) = frozen_span {
        push_rect(span, true);
    }
    if let Some(span) = scroll_span {
        push_rect(span, false);
    }
    rects
}

/// Center of the fill handle: the bottom-right corner of the selection.
pub fn fill_handle_center(rects: &[SelectionRect]) -> Option<(f32, f32)> {
    rects.last().map(|rect| (rect.x + rect.w, rect.y + rect.h))
}

/// Whether viewport point `(x, y)` grabs the fill handle.
pub fn hits_fill_handle(rects: &[SelectionRect], x: f32, y: f32) -> bool {
    fill_handle_center(rects).is_some_and(|(cx, cy)| {
        (x - cx).abs() <= FILL_HANDLE_SIZE && (y - cy).abs() <= FILL_HANDLE_SIZE
    })
}

//! Visible range selection: which columns and rows to materialize.
//!
//! Both directions binary-search pre-computed offsets, so the work per scroll
//! event is O(log n) in the number of columns/rows plus the overscan.

use serde::Serialize;

use super::{ColumnMetrics, RowHeights};

/// Inclusive range of scrollable (non-frozen) column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx <= self.end
    }

    /// Number of indices covered (ranges are never empty)
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Inclusive range of body row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row <= self.end
    }

    /// Number of indices covered (ranges are never empty)
    pub fn count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Scrollable columns to materialize at `scroll_left`, including overscan.
///
/// The scroll window is `[scroll_left + frozen width, scroll_left +
/// viewport width)`: frozen columns cover the left part of the viewport and
/// are never part of this range. Returns `None` when every column is frozen.
pub fn horizontal_range(
    metrics: &ColumnMetrics,
    scroll_left: f32,
    overscan: usize,
) -> Option<ColumnRange> {
    let first = metrics.first_unfrozen_idx();
    let last = metrics.len().checked_sub(1)?;
    let scrollable = metrics.columns.get(first..).filter(|c| !c.is_empty())?;

    let scroll_left = scroll_left.max(0.0);
    let window_start = scroll_left + metrics.total_frozen_width;
    let window_end = scroll_left + metrics.viewport_width;

    // First column whose trailing edge passes the window start
    let visible_start =
        (first + scrollable.partition_point(|c| c.right() <= window_start)).min(last);
    // Last column whose leading edge is before the window end
    let visible_end = (first + scrollable.partition_point(|c| c.left < window_end))
        .saturating_sub(1)
        .clamp(visible_start, last);

    Some(ColumnRange {
        start: visible_start.saturating_sub(overscan).max(first),
        end: visible_end.saturating_add(overscan).min(last),
    })
}

/// Columns handed to the renderer: every frozen column, then `range`.
pub fn viewport_columns(metrics: &ColumnMetrics, range: Option<ColumnRange>) -> Vec<usize> {
    let frozen = 0..metrics.frozen_count();
    match range {
        Some(range) => frozen.chain(range.start..=range.end).collect(),
        None => frozen.collect(),
    }
}

/// Body rows to materialize at `scroll_top`, including overscan.
///
/// Returns `None` for an empty body.
pub fn vertical_range(
    heights: &RowHeights,
    row_count: usize,
    scroll_top: f32,
    viewport_height: f32,
    overscan: usize,
) -> Option<RowRange> {
    let last = row_count.checked_sub(1)?;
    let scroll_top = scroll_top.max(0.0);
    let window_end = scroll_top + viewport_height.max(0.0);

    let visible_start = heights.first_row_ending_after(scroll_top).min(last);
    let visible_end = heights
        .rows_starting_before(window_end)
        .saturating_sub(1)
        .clamp(visible_start, last);

    Some(RowRange {
        start: visible_start.saturating_sub(overscan),
        end: visible_end.saturating_add(overscan).min(last),
    })
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
    use crate::layout::{compute_metrics, RowOffsets, WidthOverrides};
    use crate::types::Column;

    fn uniform(count: usize, width: f32, viewport_width: f32) -> ColumnMetrics {
        let columns: Vec<Column> = (0..count)
            .map(|i| Column::new(format!("c{i}")).with_width(width))
            .collect();
        compute_metrics(&columns, 10.0, viewport_width, &WidthOverrides::new()).unwrap()
    }

    #[test]
    fn test_initial_range_includes_one_overscan_column() {
        let metrics = uniform(10, 100.0, 300.0);
        let range = horizontal_range(&metrics, 0.0, 1).unwrap();
        assert_eq!(range, ColumnRange { start: 0, end: 3 });
        assert_eq!(range.count(), 4);
    }

    #[test]
    fn test_scrolled_range() {
        let metrics = uniform(10, 100.0, 300.0);
        // Window [250, 550): columns 2..=5 visible
        let range = horizontal_range(&metrics, 250.0, 1).unwrap();
        assert_eq!(range, ColumnRange { start: 1, end: 6 });
        let range = horizontal_range(&metrics, 250.0, 0).unwrap();
        assert_eq!(range, ColumnRange { start: 2, end: 5 });
    }

    #[test]
    fn test_range_clamped_at_end() {
        let metrics = uniform(10, 100.0, 300.0);
        let range = horizontal_range(&metrics, 700.0, 2).unwrap();
        assert_eq!(range, ColumnRange { start: 5, end: 9 });
    }

    #[test]
    fn test_frozen_columns_excluded_and_prepended() {
        let columns: Vec<Column> = (0..10)
            .map(|i| {
                let c = Column::new(format!("c{i}")).with_width(100.0);
                if i < 2 {
                    c.frozen()
                } else {
                    c
                }
            })
            .collect();
        let metrics = compute_metrics(&columns, 10.0, 400.0, &WidthOverrides::new()).unwrap();

        let range = horizontal_range(&metrics, 0.0, 0).unwrap();
        // Window [200, 400) over scrollable columns: 2 and 3
        assert_eq!(range, ColumnRange { start: 2, end: 3 });

        let range = horizontal_range(&metrics, 500.0, 1).unwrap();
        assert_eq!(range, ColumnRange { start: 6, end: 9 });
        assert_eq!(viewport_columns(&metrics, Some(range)), vec![0, 1, 6, 7, 8, 9]);
    }

    #[test]
    fn test_all_frozen() {
        let columns = vec![Column::new("a").frozen(), Column::new("b").frozen()];
        let metrics = compute_metrics(&columns, 80.0, 400.0, &WidthOverrides::new()).unwrap();
        assert_eq!(horizontal_range(&metrics, 0.0, 1), None);
        assert_eq!(viewport_columns(&metrics, None), vec![0, 1]);
    }

    #[test]
    fn test_vertical_fixed() {
        let heights = RowHeights::Fixed(35.0);
        let range = vertical_range(&heights, 1000, 0.0, 350.0, 2).unwrap();
        assert_eq!(range, RowRange { start: 0, end: 11 });

        // Window [700, 1050): rows 20..=29
        let range = vertical_range(&heights, 1000, 700.0, 350.0, 2).unwrap();
        assert_eq!(range, RowRange { start: 18, end: 31 });

        let range = vertical_range(&heights, 1000, 34_650.0, 350.0, 2).unwrap();
        assert_eq!(range.end, 999);
    }

    #[test]
    fn test_vertical_variable() {
        let heights =
            RowHeights::Variable(RowOffsets::from_heights(&[10.0, 50.0, 10.0, 10.0, 10.0]));
        // Window [15, 65): rows 1 (10..60) and 2 (60..70)
        let range = vertical_range(&heights, 5, 15.0, 50.0, 0).unwrap();
        assert_eq!(range, RowRange { start: 1, end: 2 });
        let range = vertical_range(&heights, 5, 15.0, 50.0, 1).unwrap();
        assert_eq!(range, RowRange { start: 0, end: 3 });
    }

    #[test]
    fn test_vertical_empty() {
        assert_eq!(vertical_range(&RowHeights::Fixed(35.0), 0, 0.0, 500.0, 2), None);
    }

    #[test]
    fn test_fewer_rows_than_viewport() {
        let range = vertical_range(&RowHeights::Fixed(35.0), 3, 0.0, 500.0, 2).unwrap();
        assert_eq!(range, RowRange { start: 0, end: 2 });
    }
}

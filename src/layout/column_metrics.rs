//! Column geometry: resolved widths, left offsets and the frozen prefix.
//!
//! Metrics are a pure function of the column list, the minimum width, the
//! viewport width and the user's width overrides. Callers cache them with
//! [`super::Memo`] and rebuild only when one of those inputs changes.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Serialize;

use crate::types::{CalculatedColumn, Column};

/// Per-column widths set by the user through column resize, keyed by column key.
pub type WidthOverrides = HashMap<String, f32>;

/// Geometry of every column, in calculated (frozen-first) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetrics {
    pub columns: Vec<CalculatedColumn>,
    /// Sum of all column widths
    pub total_width: f32,
    /// Sum of the frozen column widths
    pub total_frozen_width: f32,
    /// Index of the last frozen column, `None` when nothing is frozen
    pub last_frozen_idx: Option<usize>,
    pub min_column_width: f32,
    pub viewport_width: f32,
}

impl ColumnMetrics {
    /// Metrics for a grid whose viewport has not been measured yet: every
    /// column at its minimum width.
    pub fn unmeasured(columns: &[Column], min_column_width: f32) -> Self {
        let ordered = normalize_columns(columns);
        build(ordered, min_column_width, 0.0, |column| {
            column_min_width(column, min_column_width)
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CalculatedColumn> {
        self.columns.get(idx)
    }

    /// Number of frozen columns
    pub fn frozen_count(&self) -> usize {
        self.last_frozen_idx.map_or(0, |idx| idx + 1)
    }

    /// Index of the first column that scrolls horizontally.
    pub fn first_unfrozen_idx(&self) -> usize {
        self.frozen_count()
    }

    /// Calculated index of the column with the given key.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key() == key)
    }

    /// Column whose span contains content x coordinate `x` (binary search).
    pub fn column_at_x(&self, x: f32) -> Option<usize> {
        if x < 0.0 {
            return None;
        }
        let idx = self.columns.partition_point(|column| column.right() <= x);
        self.columns
            .get(idx)
            .filter(|column| column.left <= x)
            .map(|column| column.idx)
    }

    /// Frozen column whose span contains x (frozen columns never scroll).
    pub fn frozen_column_at_x(&self, x: f32) -> Option<usize> {
        if x >= self.total_frozen_width {
            return None;
        }
        self.column_at_x(x).filter(|&idx| idx < self.frozen_count())
    }
}

/// Compute column geometry for a measured viewport.
///
/// Columns with an explicit width (a user resize override, or the column's own
/// `width`) keep it, clamped up to the column minimum. The rest of the
/// viewport is split between the auto-width columns in whole pixels; the
/// leftover pixels go one each to the first auto-width columns. An auto-width
/// column never gets less than its minimum, so the grid may overflow and
/// scroll horizontally.
///
/// Returns `None` while the viewport width is not positive: the grid renders
/// nothing until a real width is known.
pub fn compute_metrics(
    columns: &[Column],
    min_column_width: f32,
    viewport_width: f32,
    width_overrides: &WidthOverrides,
) -> Option<ColumnMetrics> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        debug!("column metrics skipped: viewport width {viewport_width} not measurable");
        return None;
    }

    let ordered = normalize_columns(columns);

    let explicit_width = |column: &Column| {
        width_overrides
            .get(&column.key)
            .copied()
            .or(column.width)
            .filter(|w| w.is_finite())
            .map(|w| w.max(column_min_width(column, min_column_width)))
    };

    let mut fixed_sum = 0.0;
    let mut flexible_count = 0;
    for &(_, column) in &ordered {
        match explicit_width(column) {
            Some(width) => fixed_sum += width,
            None => flexible_count += 1,
        }
    }

    let share = FlexShare::new(viewport_width - fixed_sum, flexible_count);
    let mut nth_flexible = 0;

    let metrics = build(ordered, min_column_width, viewport_width, |column| {
        explicit_width(column).unwrap_or_else(|| {
            let width = share
                .width(nth_flexible)
                .max(column_min_width(column, min_column_width));
            nth_flexible += 1;
            width
        })
    });

    debug!(
        "column metrics: {} columns, total width {}, {} frozen",
        metrics.len(),
        metrics.total_width,
        metrics.frozen_count()
    );
    Some(metrics)
}

pub(crate) fn column_min_width(column: &Column, min_column_width: f32) -> f32 {
    column
        .min_width
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(min_column_width)
}

/// Drop duplicate keys and move frozen columns to the front, keeping
/// relative order and each column's original index.
fn normalize_columns(columns: &[Column]) -> Vec<(usize, &Column)> {
    let mut seen = HashSet::with_capacity(columns.len());
    let mut unique = Vec::with_capacity(columns.len());
    for (original_idx, column) in columns.iter().enumerate() {
        if seen.insert(column.key.as_str()) {
            unique.push((original_idx, column));
        } else {
            warn!(
                "ignoring column {original_idx}: duplicate key {:?}",
                column.key
            );
        }
    }

    let frozen_is_prefix = unique
        .iter()
        .skip_while(|(_, column)| column.frozen)
        .all(|(_, column)| !column.frozen);
    if !frozen_is_prefix {
        warn!("frozen columns are not a leading prefix; moving them to the front");
    }

    let (mut frozen, rest): (Vec<_>, Vec<_>) =
        unique.into_iter().partition(|(_, column)| column.frozen);
    frozen.extend(rest);
    frozen
}

fn build<'a>(
    ordered: Vec<(usize, &'a Column)>,
    min_column_width: f32,
    viewport_width: f32,
    mut width_of: impl FnMut(&'a Column) -> f32,
) -> ColumnMetrics {
    let mut columns = Vec::with_capacity(ordered.len());
    let mut left = 0.0;
    let mut total_frozen_width = 0.0;
    let mut last_frozen_idx = None;

    for (idx, (original_idx, column)) in ordered.into_iter().enumerate() {
        let width = width_of(column);
        if column.frozen {
            last_frozen_idx = Some(idx);
            total_frozen_width += width;
        }
        columns.push(CalculatedColumn {
            column: column.clone(),
            idx,
            original_idx,
            width,
            left,
        });
        left += width;
    }

    ColumnMetrics {
        columns,
        total_width: left,
        total_frozen_width,
        last_frozen_idx,
        min_column_width,
        viewport_width,
    }
}

/// Whole-pixel share of the unallocated width for auto-width columns.
struct FlexShare {
    base: f32,
    /// Number of leading auto-width columns that get one extra pixel
    extra: usize,
}

impl FlexShare {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn new(remaining: f32, count: usize) -> Self {
        if count == 0 || !remaining.is_finite() || remaining <= 0.0 {
            return Self {
                base: 0.0,
                extra: 0,
            };
        }
        let available = remaining.floor();
        let n = count as f32;
        let base = (available / n).floor();
        // Leftover is a whole number in [0, count)
        let extra = (available - base * n).max(0.0) as usize;
        Self { base, extra }
    }

    fn width(&self, nth: usize) -> f32 {
        if nth < self.extra {
            self.base + 1.0
        } else {
            self.base
        }
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

    fn widths(metrics: &ColumnMetrics) -> Vec<f32> {
        metrics.columns.iter().map(|c| c.width).collect()
    }

    #[test]
    fn test_even_distribution() {
        let columns: Vec<Column> = (0..4).map(|i| Column::new(format!("c{i}"))).collect();
        let metrics = compute_metrics(&columns, 80.0, 400.0, &HashMap::new()).unwrap();
        assert_eq!(widths(&metrics), vec![100.0; 4]);
        assert_eq!(metrics.total_width, 400.0);
        assert_eq!(metrics.last_frozen_idx, None);
    }

    #[test]
    fn test_remainder_goes_to_first_flexible_columns() {
        let columns: Vec<Column> = (0..3).map(|i| Column::new(format!("c{i}"))).collect();
        let metrics = compute_metrics(&columns, 10.0, 302.5, &HashMap::new()).unwrap();
        assert_eq!(widths(&metrics), vec![101.0, 101.0, 100.0]);
        assert_eq!(metrics.total_width, 302.0);
    }

    #[test]
    fn test_fixed_widths_reduce_flexible_share() {
        let columns = vec![
            Column::new("id").with_width(50.0).with_min_width(20.0),
            Column::new("name"),
            Column::new("email"),
        ];
        let metrics = compute_metrics(&columns, 80.0, 450.0, &HashMap::new()).unwrap();
        assert_eq!(widths(&metrics), vec![50.0, 200.0, 200.0]);
        let lefts: Vec<f32> = metrics.columns.iter().map(|c| c.left).collect();
        assert_eq!(lefts, vec![0.0, 50.0, 250.0]);
    }

    #[test]
    fn test_flexible_columns_floor_at_min_width() {
        let columns = vec![
            Column::new("a").with_width(500.0),
            Column::new("b"),
            Column::new("c"),
        ];
        let metrics = compute_metrics(&columns, 80.0, 600.0, &HashMap::new()).unwrap();
        assert_eq!(widths(&metrics), vec![500.0, 80.0, 80.0]);
        assert_eq!(metrics.total_width, 660.0);
    }

    #[test]
    fn test_fixed_width_clamped_to_min() {
        let columns = vec![Column::new("a").with_width(10.0)];
        let metrics = compute_metrics(&columns, 80.0, 600.0, &HashMap::new()).unwrap();
        assert_eq!(widths(&metrics), vec![80.0]);
    }

    #[test]
    fn test_override_takes_precedence() {
        let columns = vec![Column::new("a").with_width(100.0), Column::new("b")];
        let mut overrides = WidthOverrides::new();
        overrides.insert("a".to_string(), 150.0);
        let metrics = compute_metrics(&columns, 80.0, 400.0, &overrides).unwrap();
        assert_eq!(widths(&metrics), vec![150.0, 250.0]);
    }

    #[test]
    fn test_frozen_columns_moved_to_front() {
        let columns = vec![
            Column::new("a"),
            Column::new("b").frozen(),
            Column::new("c"),
            Column::new("d").frozen(),
        ];
        let metrics = compute_metrics(&columns, 80.0, 400.0, &HashMap::new()).unwrap();
        let keys: Vec<&str> = metrics.columns.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["b", "d", "a", "c"]);
        let originals: Vec<usize> = metrics.columns.iter().map(|c| c.original_idx).collect();
        assert_eq!(originals, vec![1, 3, 0, 2]);
        assert_eq!(metrics.last_frozen_idx, Some(1));
        assert_eq!(metrics.total_frozen_width, 200.0);
        assert!(metrics.columns.iter().enumerate().all(|(i, c)| c.idx == i));
    }

    #[test]
    fn test_duplicate_keys_dropped() {
        let columns = vec![Column::new("a"), Column::new("b"), Column::new("a")];
        let metrics = compute_metrics(&columns, 80.0, 400.0, &HashMap::new()).unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics.columns[1].original_idx, 1);
    }

    #[test]
    fn test_unmeasured_viewport() {
        let columns = vec![Column::new("a")];
        assert!(compute_metrics(&columns, 80.0, 0.0, &HashMap::new()).is_none());
        assert!(compute_metrics(&columns, 80.0, -10.0, &HashMap::new()).is_none());
        assert!(compute_metrics(&columns, 80.0, f32::NAN, &HashMap::new()).is_none());

        let fallback = ColumnMetrics::unmeasured(
            &[Column::new("a").with_width(300.0), Column::new("b")],
            80.0,
        );
        assert_eq!(widths(&fallback), vec![80.0, 80.0]);
        assert_eq!(fallback.total_width, 160.0);
    }

    #[test]
    fn test_column_at_x() {
        let columns: Vec<Column> = (0..3).map(|i| Column::new(format!("c{i}"))).collect();
        let metrics = compute_metrics(&columns, 80.0, 300.0, &HashMap::new()).unwrap();
        assert_eq!(metrics.column_at_x(0.0), Some(0));
        assert_eq!(metrics.column_at_x(99.9), Some(0));
        assert_eq!(metrics.column_at_x(100.0), Some(1));
        assert_eq!(metrics.column_at_x(299.0), Some(2));
        assert_eq!(metrics.column_at_x(300.0), None);
        assert_eq!(metrics.column_at_x(-1.0), None);
    }
}

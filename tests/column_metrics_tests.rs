//! Column metrics tests
//!
//! Tests for width resolution, flexible width distribution, frozen column
//! ordering and x-coordinate lookups.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::HashMap;

use test_case::test_case;
use vgrid::layout::{compute_metrics, ColumnMetrics, WidthOverrides};
use vgrid::Column;

fn widths(metrics: &ColumnMetrics) -> Vec<f32> {
    metrics.columns.iter().map(|c| c.width).collect()
}

fn keys(metrics: &ColumnMetrics) -> Vec<&str> {
    metrics.columns.iter().map(|c| c.key()).collect()
}

fn flexible(count: usize) -> Vec<Column> {
    (0..count).map(|i| Column::new(format!("c{i}"))).collect()
}

#[test_case(4, 400.0, &[100.0, 100.0, 100.0, 100.0] ; "divides evenly")]
#[test_case(3, 100.0, &[34.0, 33.0, 33.0] ; "remainder to first columns")]
#[test_case(3, 101.9, &[34.0, 34.0, 33.0] ; "fractional width floored")]
#[test_case(2, 30.0, &[20.0, 20.0] ; "never below minimum")]
fn test_flexible_distribution(count: usize, viewport_width: f32, expected: &[f32]) {
    let metrics =
        compute_metrics(&flexible(count), 20.0, viewport_width, &WidthOverrides::new()).unwrap();
    assert_eq!(widths(&metrics), expected);
}

#[test]
fn test_unmeasured_viewport_yields_nothing() {
    let columns = flexible(3);
    assert!(compute_metrics(&columns, 80.0, 0.0, &HashMap::new()).is_none());
    assert!(compute_metrics(&columns, 80.0, -5.0, &HashMap::new()).is_none());
    assert!(compute_metrics(&columns, 80.0, f32::NAN, &HashMap::new()).is_none());

    let fallback = ColumnMetrics::unmeasured(&columns, 80.0);
    assert_eq!(widths(&fallback), vec![80.0, 80.0, 80.0]);
}

#[test]
fn test_frozen_columns_move_to_front() {
    let columns = vec![
        Column::new("a"),
        Column::new("b").with_width(60.0).frozen(),
        Column::new("c"),
        Column::new("d").with_width(40.0).frozen(),
    ];
    let metrics = compute_metrics(&columns, 20.0, 400.0, &HashMap::new()).unwrap();

    assert_eq!(keys(&metrics), vec!["b", "d", "a", "c"]);
    assert_eq!(metrics.last_frozen_idx, Some(1));
    assert_eq!(metrics.total_frozen_width, 100.0);
    assert_eq!(metrics.frozen_count(), 2);
    assert_eq!(metrics.first_unfrozen_idx(), 2);

    // Original indices survive the reorder
    let original: Vec<usize> = metrics.columns.iter().map(|c| c.original_idx).collect();
    assert_eq!(original, vec![1, 3, 0, 2]);
    let idx: Vec<usize> = metrics.columns.iter().map(|c| c.idx).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
}

#[test]
fn test_offsets_are_cumulative() {
    let columns = vec![
        Column::new("a").with_width(120.0),
        Column::new("b").with_width(80.0),
        Column::new("c").with_width(200.0),
    ];
    let metrics = compute_metrics(&columns, 80.0, 300.0, &HashMap::new()).unwrap();
    let lefts: Vec<f32> = metrics.columns.iter().map(|c| c.left).collect();
    assert_eq!(lefts, vec![0.0, 120.0, 200.0]);
    assert_eq!(metrics.total_width, 400.0);
    assert_eq!(metrics.columns[2].right(), 400.0);
}

#[test]
fn test_duplicate_keys_keep_first() {
    let columns = vec![
        Column::new("a").with_width(100.0),
        Column::new("a").with_width(300.0),
        Column::new("b").with_width(100.0),
    ];
    let metrics = compute_metrics(&columns, 80.0, 500.0, &HashMap::new()).unwrap();
    assert_eq!(keys(&metrics), vec!["a", "b"]);
    assert_eq!(widths(&metrics), vec![100.0, 100.0]);
    assert_eq!(metrics.columns[1].original_idx, 2);
}

#[test]
fn test_width_overrides() {
    let columns = vec![
        Column::new("a").with_width(100.0),
        Column::new("b"),
        Column::new("c"),
    ];
    let mut overrides = WidthOverrides::new();
    overrides.insert("b".to_string(), 150.0);
    let metrics = compute_metrics(&columns, 80.0, 500.0, &overrides).unwrap();
    // "b" is now fixed; "c" takes the rest
    assert_eq!(widths(&metrics), vec![100.0, 150.0, 250.0]);

    // Overrides are clamped to the column minimum as well
    overrides.insert("a".to_string(), 5.0);
    let metrics = compute_metrics(&columns, 80.0, 500.0, &overrides).unwrap();
    assert_eq!(metrics.columns[0].width, 80.0);
}

#[test]
fn test_per_column_min_width() {
    let columns = vec![
        Column::new("a").with_width(300.0),
        Column::new("b").with_min_width(150.0),
        Column::new("c").with_min_width(10.0),
    ];
    let metrics = compute_metrics(&columns, 80.0, 400.0, &HashMap::new()).unwrap();
    assert_eq!(widths(&metrics), vec![300.0, 150.0, 50.0]);
}

#[test]
fn test_column_lookup_by_x() {
    let columns = vec![
        Column::new("frozen").with_width(50.0).frozen(),
        Column::new("a").with_width(100.0),
        Column::new("b").with_width(100.0),
    ];
    let metrics = compute_metrics(&columns, 20.0, 200.0, &HashMap::new()).unwrap();

    assert_eq!(metrics.column_at_x(0.0), Some(0));
    assert_eq!(metrics.column_at_x(49.9), Some(0));
    assert_eq!(metrics.column_at_x(50.0), Some(1));
    assert_eq!(metrics.column_at_x(249.0), Some(2));
    assert_eq!(metrics.column_at_x(250.0), None);
    assert_eq!(metrics.column_at_x(-1.0), None);

    assert_eq!(metrics.frozen_column_at_x(10.0), Some(0));
    assert_eq!(metrics.frozen_column_at_x(60.0), None);
    assert_eq!(metrics.index_of("b"), Some(2));
    assert_eq!(metrics.index_of("zzz"), None);
}

#[test]
fn test_empty_column_list() {
    let metrics = compute_metrics(&[], 80.0, 500.0, &HashMap::new()).unwrap();
    assert!(metrics.is_empty());
    assert_eq!(metrics.total_width, 0.0);
    assert_eq!(metrics.last_frozen_idx, None);
}

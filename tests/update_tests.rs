//! Update coalescing tests
//!
//! Tests that edits, pastes and fill operations each become exactly one
//! update event, with read-only cells skipped and source rows untouched.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{fixed_columns, rows_from};
use serde_json::{json, Value};
use vgrid::layout::{compute_metrics, WidthOverrides};
use vgrid::{
    CalculatedColumn, CellRange, Column, Position, Row, UpdateAction, UpdateCoalescer,
};

fn calculated(columns: &[Column]) -> Vec<CalculatedColumn> {
    compute_metrics(columns, 80.0, 1_000.0, &WidthOverrides::new())
        .unwrap()
        .columns
}

fn range(a: (usize, isize), b: (usize, isize)) -> CellRange {
    CellRange::from_corners(Position::new(a.0, a.1), Position::new(b.0, b.1))
}

fn column_values(rows: &[Row], key: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get(key).cloned().unwrap_or(Value::Null))
        .collect()
}

fn any(_: usize, _: &CalculatedColumn) -> bool {
    true
}

#[test]
fn test_paste_tiles_source_in_one_event() {
    let columns = calculated(&fixed_columns(1, 100.0));
    let mut rows = rows_from(&[&["A"], &["B"], &[""], &[""]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer
        .apply_paste(range((0, 0), (0, 1)), range((0, 0), (0, 3)))
        .unwrap();
    assert_eq!(event.action, UpdateAction::Paste);
    assert_eq!(event.from_row, 0);
    assert_eq!(event.to_row, 3);
    assert_eq!(event.patches.len(), 4);

    event.apply_to(&mut rows);
    assert_eq!(
        column_values(&rows, "c0"),
        vec![json!("A"), json!("B"), json!("A"), json!("B")]
    );
}

#[test]
fn test_paste_text_expands_single_target() {
    let columns = calculated(&fixed_columns(3, 100.0));
    let rows = rows_from(&[&["", "", ""], &["", "", ""], &["", "", ""]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer
        .apply_paste_text("1\t2\n3\t4\n", range((1, 1), (1, 1)))
        .unwrap();
    assert_eq!(event.destination, range((1, 1), (2, 2)));
    assert_eq!(event.cell_count(), 4);
    assert_eq!(event.value_at(1, "c1"), Some(&json!("1")));
    assert_eq!(event.value_at(1, "c2"), Some(&json!("2")));
    assert_eq!(event.value_at(2, "c1"), Some(&json!("3")));
    assert_eq!(event.value_at(2, "c2"), Some(&json!("4")));
    assert_eq!(event.value_at(0, "c1"), None);
}

#[test]
fn test_paste_clipped_to_grid() {
    let columns = calculated(&fixed_columns(2, 100.0));
    let rows = rows_from(&[&["", ""], &["", ""]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer
        .apply_paste_text("a\tb\tc\nd\te\tf\ng\th\ti", range((1, 1), (1, 1)))
        .unwrap();
    assert_eq!(event.destination, range((1, 1), (1, 1)));
    assert_eq!(event.cell_count(), 1);
    assert_eq!(event.value_at(1, "c1"), Some(&json!("a")));
}

#[test]
fn test_read_only_cells_are_skipped() {
    let columns = calculated(&[
        Column::new("c0").with_width(100.0),
        Column::new("c1").with_width(100.0).read_only(),
    ]);
    let rows = rows_from(&[&["x", "y"], &["", ""], &["", ""]]);
    let host_refuses_row_1 = |row: usize, _: &CalculatedColumn| row != 1;
    let coalescer = UpdateCoalescer::new(&columns, &rows, host_refuses_row_1);

    assert!(coalescer.can_write(0, 0));
    assert!(!coalescer.can_write(0, 1));
    assert!(!coalescer.can_write(1, 0));
    assert!(!coalescer.can_write(5, 0));

    let event = coalescer
        .apply_fill_drag(range((0, 0), (1, 0)), range((0, 0), (1, 2)))
        .unwrap();
    assert_eq!(event.action, UpdateAction::CellDrag);
    // Only (row 2, c0) is writable outside the source
    assert_eq!(event.cell_count(), 1);
    assert_eq!(event.value_at(2, "c0"), Some(&json!("x")));
    assert_eq!(event.from_row, 2);
    assert_eq!(event.to_row, 2);
}

#[test]
fn test_nothing_writable_emits_nothing() {
    let columns = calculated(&[Column::new("c0").with_width(100.0).read_only()]);
    let rows = rows_from(&[&["a"], &["b"]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    assert!(coalescer.begin_edit(Position::new(0, 0), json!("z")).is_none());
    assert!(coalescer.apply_fill_down(Position::new(0, 0)).is_none());
    assert!(coalescer
        .apply_paste_text("q", range((0, 0), (0, 1)))
        .is_none());
}

#[test]
fn test_begin_edit() {
    let columns = calculated(&fixed_columns(2, 100.0));
    let rows = rows_from(&[&["a", "b"]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer.begin_edit(Position::new(1, 0), json!(42)).unwrap();
    assert_eq!(event.action, UpdateAction::CellUpdate);
    assert_eq!(event.from_cell, Position::new(1, 0));
    assert_eq!(event.patches.len(), 1);
    assert_eq!(event.value_at(0, "c1"), Some(&json!(42)));
    // Untouched keys are absent from the patch
    assert_eq!(event.value_at(0, "c0"), None);

    // Header row and out-of-range cells are not editable
    assert!(coalescer
        .begin_edit(Position::new(0, -1), json!(1))
        .is_none());
    assert!(coalescer.begin_edit(Position::new(0, 7), json!(1)).is_none());
}

#[test]
fn test_fill_down_to_last_row() {
    let columns = calculated(&fixed_columns(2, 100.0));
    let rows = rows_from(&[&["a", "1"], &["b", "2"], &["c", "3"], &["d", "4"]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer.apply_fill_down(Position::new(1, 1)).unwrap();
    assert_eq!(event.action, UpdateAction::ColumnFill);
    assert_eq!(event.from_row, 2);
    assert_eq!(event.to_row, 3);
    assert_eq!(event.value_at(2, "c1"), Some(&json!("2")));
    assert_eq!(event.value_at(3, "c1"), Some(&json!("2")));
    assert_eq!(event.value_at(2, "c0"), None);

    // Nothing below the last row
    assert!(coalescer.apply_fill_down(Position::new(1, 3)).is_none());
}

#[test]
fn test_fill_drag_upward_continues_pattern() {
    let columns = calculated(&fixed_columns(1, 100.0));
    let rows = rows_from(&[&[""], &[""], &[""], &["A"], &["B"]]);
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);

    let event = coalescer
        .apply_fill_drag(range((0, 3), (0, 4)), range((0, 0), (0, 4)))
        .unwrap();
    // Row 2 sits directly above "A", so it takes "B"
    assert_eq!(event.value_at(2, "c0"), Some(&json!("B")));
    assert_eq!(event.value_at(1, "c0"), Some(&json!("A")));
    assert_eq!(event.value_at(0, "c0"), Some(&json!("B")));
    // Source cells are not rewritten
    assert_eq!(event.value_at(3, "c0"), None);
    assert_eq!(event.cell_count(), 3);
}

#[test]
fn test_coalescer_never_mutates_rows() {
    let columns = calculated(&fixed_columns(1, 100.0));
    let rows = rows_from(&[&["A"], &["B"]]);
    let before = rows.clone();
    let coalescer = UpdateCoalescer::new(&columns, &rows, any);
    let _ = coalescer.apply_paste(range((0, 0), (0, 0)), range((0, 1), (0, 1)));
    assert_eq!(rows, before);
}

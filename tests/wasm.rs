//! Browser tests for the JavaScript binding.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect, JSON};
use vgrid::DataGrid;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const COLUMNS: &str = r#"[{"key":"a","width":100},{"key":"b","width":100}]"#;
const ROWS: &str = r#"[{"a":"1","b":"2"},{"a":"3","b":"4"},{"a":"5","b":"6"}]"#;

/// A 2x3 grid measured at 400x385 (first data row starts at y = 35).
fn grid() -> DataGrid {
    let grid = DataGrid::new(None, JsValue::UNDEFINED).unwrap();
    grid.resize(400.0, 385.0);
    grid.set_columns(JSON::parse(COLUMNS).unwrap()).unwrap();
    grid.set_rows(JSON::parse(ROWS).unwrap()).unwrap();
    grid
}

/// Callback that records its first argument.
fn recorder() -> (Closure<dyn FnMut(JsValue)>, Rc<RefCell<Vec<JsValue>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let closure = Closure::wrap(Box::new(move |value: JsValue| {
        sink.borrow_mut().push(value);
    }) as Box<dyn FnMut(JsValue)>);
    (closure, calls)
}

fn as_function(closure: &Closure<dyn FnMut(JsValue)>) -> Function {
    closure.as_ref().unchecked_ref::<Function>().clone()
}

#[wasm_bindgen_test]
fn test_unknown_event_is_rejected() {
    let grid = grid();
    assert!(grid.on("selectionChanged", None).is_err());
    assert!(grid.on("scroll", None).is_ok());
}

#[wasm_bindgen_test]
fn test_click_reports_selected_cell() {
    let grid = grid();
    let (closure, calls) = recorder();
    grid.on("selectedCellChange", Some(as_function(&closure)))
        .unwrap();

    assert!(grid.pointer_down(150.0, 87.0, false));
    grid.pointer_up();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    let idx = Reflect::get(&calls[0], &"idx".into()).unwrap();
    let row_idx = Reflect::get(&calls[0], &"rowIdx".into()).unwrap();
    assert_eq!(idx.as_f64(), Some(1.0));
    assert_eq!(row_idx.as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn test_is_cell_editable_refuses_selection() {
    let grid = grid();
    let refuse_all = Function::new_with_args("row, key", "return false;");
    grid.on("isCellEditable", Some(refuse_all)).unwrap();
    let (closure, calls) = recorder();
    grid.on("selectedCellChange", Some(as_function(&closure)))
        .unwrap();

    grid.pointer_down(50.0, 52.0, false);
    assert!(calls.borrow().is_empty());
}

#[wasm_bindgen_test]
fn test_edit_commit_emits_rows_update() {
    let grid = grid();
    let (closure, calls) = recorder();
    grid.on("rowsUpdate", Some(as_function(&closure))).unwrap();

    assert!(grid.double_click(50.0, 52.0));
    assert_eq!(grid.editor_text().as_deref(), Some("1"));
    grid.set_edit_text("9");
    assert!(grid.commit_edit());

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    let action = Reflect::get(&calls[0], &"action".into()).unwrap();
    assert!(action.is_string());
}

#[wasm_bindgen_test]
fn test_second_grid_keeps_logging_installed() {
    let _first = grid();
    let _second = grid();
    assert_eq!(log::max_level(), log::LevelFilter::Warn);
}

#[wasm_bindgen_test]
fn test_render_plan_serializes() {
    let grid = grid();
    let plan = grid.render_plan().unwrap();
    assert!(plan.is_object());
    let cells = grid.visible_cells().unwrap();
    assert!(js_sys::Array::is_array(&cells));
}

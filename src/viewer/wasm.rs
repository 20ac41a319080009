//! JavaScript binding: `DataGrid` wraps a `ViewportController` for the browser.
//!
//! Host callbacks are registered with `grid.on(event, fn)`. Callbacks fired
//! while the grid state is borrowed are queued and invoked after the borrow
//! ends, so JavaScript may call back into the grid from inside them.
//! `isCellEditable` is the exception: it is called synchronously and must not
//! call into the grid.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, ResizeObserver, ResizeObserverEntry};

use super::{GridHandle, GridHost, ViewportController};
use crate::config::GridConfig;
use crate::layout::ScrollPosition;
use crate::render::{EmptyMessage, EmptyRowsView};
use crate::types::{
    CalculatedColumn, Column, Position, Row, RowsUpdateEvent, SelectedRange, SortColumn,
};

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[vgrid] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&message),
            log::Level::Warn => web_sys::console::warn_1(&message),
            log::Level::Info => web_sys::console::info_1(&message),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger unless the page already set one.
fn init_logging() {
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

/// Callback names accepted by `DataGrid.on`.
const EVENTS: &[&str] = &[
    "isCellEditable",
    "selectedCellChange",
    "selectedRangeChange",
    "selectionCleared",
    "scroll",
    "rowsUpdate",
    "sortChange",
    "filtersChange",
    "columnResize",
    "copy",
];

/// `GridHost` backed by JavaScript functions.
#[derive(Default)]
struct JsHost {
    callbacks: BTreeMap<String, Function>,
    pending: Vec<(Function, Array)>,
}

impl JsHost {
    fn queue(&mut self, event: &str, args: Array) {
        if let Some(callback) = self.callbacks.get(event) {
            self.pending.push((callback.clone(), args));
        }
    }

    fn queue_value<T: Serialize>(&mut self, event: &str, value: &T) {
        if !self.callbacks.contains_key(event) {
            return;
        }
        match serde_wasm_bindgen::to_value(value) {
            Ok(value) => self.queue(event, Array::of1(&value)),
            Err(e) => {
                web_sys::console::warn_1(&format!("{event}: serialization error: {e}").into());
            }
        }
    }
}

impl GridHost for JsHost {
    fn is_cell_editable(&self, row_idx: usize, column: &CalculatedColumn) -> bool {
        let Some(callback) = self.callbacks.get("isCellEditable") else {
            return true;
        };
        match callback.call2(
            &JsValue::NULL,
            &JsValue::from_f64(index_to_f64(row_idx)),
            &JsValue::from_str(column.key()),
        ) {
            Ok(result) => result.as_bool().unwrap_or(true),
            Err(e) => {
                web_sys::console::warn_2(&"isCellEditable threw".into(), &e);
                false
            }
        }
    }

    fn on_selected_cell_change(&mut self, position: Position) {
        self.queue_value("selectedCellChange", &position);
    }

    fn on_selected_cell_range_change(&mut self, range: SelectedRange) {
        self.queue_value("selectedRangeChange", &range);
    }

    fn on_selection_cleared(&mut self) {
        self.queue("selectionCleared", Array::new());
    }

    fn on_scroll(&mut self, scroll: ScrollPosition) {
        self.queue_value("scroll", &scroll);
    }

    fn on_rows_update(&mut self, event: RowsUpdateEvent) {
        self.queue_value("rowsUpdate", &event);
    }

    fn on_sort_change(&mut self, sort: Option<SortColumn>) {
        self.queue_value("sortChange", &sort);
    }

    fn on_filters_change(&mut self, filters: &BTreeMap<String, String>) {
        self.queue_value("filtersChange", filters);
    }

    fn on_column_resize(&mut self, original_idx: usize, width: f32) {
        self.queue(
            "columnResize",
            Array::of2(
                &JsValue::from_f64(index_to_f64(original_idx)),
                &JsValue::from_f64(f64::from(width)),
            ),
        );
    }

    fn on_copy(&mut self, text: String) {
        self.queue("copy", Array::of1(&JsValue::from_str(&text)));
    }
}

struct GridState {
    controller: ViewportController<JsHost>,
    /// Host rows, replaced wholesale by `setRows`
    rows: Vec<Row>,
}

#[allow(clippy::cast_precision_loss)]
fn index_to_f64(idx: usize) -> f64 {
    idx as f64
}

#[allow(clippy::cast_possible_truncation)]
fn px(value: f64) -> f32 {
    value as f32
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Deserialization error: {e}")))
}

/// Run `f` with the grid state borrowed, then invoke the callbacks it queued.
fn with_state<R>(state: &Rc<RefCell<GridState>>, f: impl FnOnce(&mut GridState) -> R) -> R {
    let (result, pending) = {
        let mut s = state.borrow_mut();
        let result = f(&mut s);
        let pending = std::mem::take(&mut s.controller.host_mut().pending);
        (result, pending)
    };
    for (callback, args) in pending {
        if let Err(e) = callback.apply(&JsValue::NULL, &args) {
            web_sys::console::warn_2(&"grid callback threw".into(), &e);
        }
    }
    result
}

/// The data grid exported to JavaScript
#[wasm_bindgen]
pub struct DataGrid {
    state: Rc<RefCell<GridState>>,
    resize_observer: Option<ResizeObserver>,
    #[allow(dead_code)]
    resize_closure: Option<Closure<dyn FnMut(Array)>>,
}

#[wasm_bindgen]
impl DataGrid {
    /// Create a grid. With a container element, its size is tracked by a
    /// `ResizeObserver`; without one, call `resize` yourself.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Option<HtmlElement>, config: JsValue) -> Result<DataGrid, JsValue> {
        console_error_panic_hook::set_once();
        init_logging();

        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            from_js(config)?
        };
        config.validate()?;

        let state = Rc::new(RefCell::new(GridState {
            controller: ViewportController::new(config, JsHost::default()),
            rows: Vec::new(),
        }));

        let Some(container) = container else {
            return Ok(DataGrid {
                state,
                resize_observer: None,
                resize_closure: None,
            });
        };

        // Initial measurement; the observer reports later changes
        state.borrow_mut().controller.resize(
            px(f64::from(container.client_width())),
            px(f64::from(container.client_height())),
        );

        let weak: Weak<RefCell<GridState>> = Rc::downgrade(&state);
        let closure = Closure::wrap(Box::new(move |entries: Array| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Some(entry) = entries
                .iter()
                .last()
                .and_then(|entry| entry.dyn_into::<ResizeObserverEntry>().ok())
            else {
                return;
            };
            let rect = entry.content_rect();
            with_state(&state, |s| {
                s.controller.resize(px(rect.width()), px(rect.height()));
            });
        }) as Box<dyn FnMut(Array)>);

        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(&container);

        Ok(DataGrid {
            state,
            resize_observer: Some(observer),
            resize_closure: Some(closure),
        })
    }

    /// Register a callback. Passing `null` removes it.
    ///
    /// # Errors
    /// Returns an error for unknown event names.
    pub fn on(&self, event: &str, callback: Option<Function>) -> Result<(), JsValue> {
        if !EVENTS.contains(&event) {
            return Err(JsValue::from_str(&format!("Unknown grid event: {event}")));
        }
        let mut s = self.state.borrow_mut();
        let callbacks = &mut s.controller.host_mut().callbacks;
        match callback {
            Some(callback) => {
                callbacks.insert(event.to_string(), callback);
            }
            None => {
                callbacks.remove(event);
            }
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<Column> = from_js(columns)?;
        with_state(&self.state, |s| s.controller.set_columns(columns));
        Ok(())
    }

    #[wasm_bindgen(js_name = setRows)]
    pub fn set_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = from_js(rows)?;
        with_state(&self.state, |s| {
            s.controller.set_row_count(rows.len());
            s.rows = rows;
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = setSummaryRowCount)]
    pub fn set_summary_row_count(&self, count: usize) {
        with_state(&self.state, |s| s.controller.set_summary_row_count(count));
    }

    /// Show `message` instead of rows while the grid is empty.
    #[wasm_bindgen(js_name = setEmptyMessage)]
    pub fn set_empty_message(&self, message: Option<String>) {
        self.state
            .borrow_mut()
            .controller
            .set_empty_rows_view(
                message.map(|m| Box::new(EmptyMessage(m)) as Box<dyn EmptyRowsView>),
            );
    }

    pub fn resize(&self, width: f32, height: f32) {
        with_state(&self.state, |s| s.controller.resize(width, height));
    }

    #[wasm_bindgen(js_name = handleScroll)]
    pub fn handle_scroll(&self, scroll_left: f32, scroll_top: f32) -> bool {
        with_state(&self.state, |s| s.controller.handle_scroll(scroll_left, scroll_top))
    }

    #[wasm_bindgen(js_name = scrollBy)]
    pub fn scroll_by(&self, delta_x: f32, delta_y: f32) -> bool {
        with_state(&self.state, |s| s.controller.scroll_by(delta_x, delta_y))
    }

    /// Returns true when the key was consumed and the default action
    /// should be prevented.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        with_state(&self.state, |s| {
            s.controller.handle_key(key, ctrl, shift, &s.rows)
        })
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f32, y: f32, shift: bool) -> bool {
        with_state(&self.state, |s| s.controller.pointer_down(x, y, shift, &s.rows))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f32, y: f32) -> bool {
        with_state(&self.state, |s| s.controller.pointer_move(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) -> bool {
        with_state(&self.state, |s| s.controller.pointer_up(&s.rows))
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, x: f32, y: f32) -> bool {
        with_state(&self.state, |s| s.controller.double_click(x, y, &s.rows))
    }

    /// Focus left the grid.
    pub fn blur(&self) -> bool {
        with_state(&self.state, |s| s.controller.click_outside())
    }

    #[wasm_bindgen(js_name = pasteText)]
    pub fn paste_text(&self, text: &str) -> bool {
        with_state(&self.state, |s| s.controller.paste_text(text, &s.rows))
    }

    #[wasm_bindgen(js_name = renderPlan)]
    pub fn render_plan(&self) -> Result<JsValue, JsValue> {
        let plan = with_state(&self.state, |s| s.controller.render_plan());
        to_js(&plan)
    }

    #[wasm_bindgen(js_name = visibleCells)]
    pub fn visible_cells(&self) -> Result<JsValue, JsValue> {
        let cells = with_state(&self.state, |s| s.controller.visible_cells(&s.rows));
        to_js(&cells)
    }

    #[wasm_bindgen(js_name = selectionOverlay)]
    pub fn selection_overlay(&self) -> Result<JsValue, JsValue> {
        let rects = with_state(&self.state, |s| s.controller.selection_overlay());
        to_js(&rects)
    }

    #[wasm_bindgen(js_name = columnMetrics)]
    pub fn column_metrics(&self) -> Result<JsValue, JsValue> {
        let metrics = with_state(&self.state, |s| s.controller.metrics());
        to_js(&*metrics)
    }

    #[wasm_bindgen(js_name = scrollToColumn)]
    pub fn scroll_to_column(&self, idx: usize) -> Result<(), JsValue> {
        with_state(&self.state, |s| s.controller.scroll_to_column(idx)).map_err(Into::into)
    }

    #[wasm_bindgen(js_name = scrollToRow)]
    pub fn scroll_to_row(&self, row_idx: usize) -> Result<(), JsValue> {
        with_state(&self.state, |s| s.controller.scroll_to_row(row_idx)).map_err(Into::into)
    }

    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&self, position: JsValue) -> Result<(), JsValue> {
        let position: Position = from_js(position)?;
        with_state(&self.state, |s| s.controller.select_cell(position)).map_err(Into::into)
    }

    #[wasm_bindgen(js_name = openCellEditor)]
    pub fn open_cell_editor(&self, position: JsValue) -> Result<bool, JsValue> {
        let position: Position = from_js(position)?;
        with_state(&self.state, |s| {
            s.controller.open_cell_editor(position, &s.rows)
        })
        .map_err(Into::into)
    }

    /// Initial text for the open editor, if any.
    #[wasm_bindgen(js_name = editorText)]
    pub fn editor_text(&self) -> Option<String> {
        with_state(&self.state, |s| s.controller.editor_text(&s.rows))
    }

    #[wasm_bindgen(js_name = setEditText)]
    pub fn set_edit_text(&self, text: &str) -> bool {
        with_state(&self.state, |s| s.controller.set_edit_text(text, &s.rows))
    }

    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&self) -> bool {
        with_state(&self.state, |s| s.controller.commit_edit(&s.rows))
    }

    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&self) -> bool {
        with_state(&self.state, |s| s.controller.cancel_edit())
    }

    #[wasm_bindgen(js_name = toggleSort)]
    pub fn toggle_sort(&self, idx: usize) -> bool {
        with_state(&self.state, |s| s.controller.toggle_sort(idx))
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&self, key: &str, value: &str) -> Result<(), JsValue> {
        with_state(&self.state, |s| s.controller.set_filter(key, value)).map_err(Into::into)
    }

    #[wasm_bindgen(js_name = resizeColumn)]
    pub fn resize_column(&self, idx: usize, width: f32) -> Result<bool, JsValue> {
        with_state(&self.state, |s| s.controller.resize_column(idx, width)).map_err(Into::into)
    }

    /// Stop observing the container. The grid stays usable with manual
    /// `resize` calls.
    pub fn destroy(&mut self) {
        if let Some(observer) = self.resize_observer.take() {
            observer.disconnect();
        }
        self.resize_closure = None;
    }
}

impl Drop for DataGrid {
    fn drop(&mut self) {
        self.destroy();
    }
}

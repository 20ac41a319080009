//! Pointer, keyboard, clipboard and editor event handlers for
//! `ViewportController`.
//!
//! Handlers return `true` when the event was consumed, so the host knows
//! whether to let the browser apply its default action.

use log::debug;
use serde_json::Value;

use super::{editable_check, FillDrag, GridHost, ViewportController};
use crate::editor::{copy_range_text, EditSession, UpdateCoalescer};
use crate::layout::f32_to_index;
use crate::render::{hits_fill_handle, CellContext};
use crate::selection::{Direction, NavigationKey, SelectionState};
use crate::types::{CalculatedColumn, CellRange, Position, Row, HEADER_ROW_IDX};

/// Target of a hit test (what was clicked)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A body cell, or a header cell with `row_idx == -1`
    Cell(Position),
    /// The header filter cell of a column
    Filter(usize),
    /// A pinned summary row cell
    Summary { idx: usize, summary_row: usize },
    /// The fill handle at the selection's bottom-right corner
    FillHandle,
    /// Nothing (outside any interactive region)
    None,
}

/// What a key press asks for, before it reaches the selection machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyIntent {
    Navigate(NavigationKey),
    Extend(Direction),
}

fn parse_key(key: &str, ctrl: bool, shift: bool) -> Option<KeyIntent> {
    let direction = match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = direction {
        return Some(if shift {
            KeyIntent::Extend(direction)
        } else {
            KeyIntent::Navigate(NavigationKey::Arrow(direction))
        });
    }
    let key = match key {
        "Tab" if shift => NavigationKey::ShiftTab,
        "Tab" => NavigationKey::Tab,
        "Home" if ctrl => NavigationKey::CtrlHome,
        "Home" => NavigationKey::Home,
        "End" if ctrl => NavigationKey::CtrlEnd,
        "End" => NavigationKey::End,
        "PageUp" => NavigationKey::PageUp,
        "PageDown" => NavigationKey::PageDown,
        _ => return None,
    };
    Some(KeyIntent::Navigate(key))
}

/// A write request for the update coalescer.
enum UpdateRequest<'t> {
    Edit(Position, Value),
    Paste {
        source: CellRange,
        destination: CellRange,
    },
    PasteText {
        text: &'t str,
        destination: CellRange,
    },
    FillDrag {
        source: CellRange,
        destination: CellRange,
    },
    FillDown(Position),
}

impl<H: GridHost> ViewportController<H> {
    /// What lies under viewport point `(x, y)`.
    pub fn hit_test(&mut self, x: f32, y: f32) -> HitTarget {
        if !self.viewport.is_measured()
            || x < 0.0
            || y < 0.0
            || x >= self.viewport.width
            || y >= self.viewport.height
        {
            return HitTarget::None;
        }
        if self.selection.state().cell_range().is_some()
            && hits_fill_handle(&self.selection_overlay(), x, y)
        {
            return HitTarget::FillHandle;
        }

        let metrics = self.metrics();
        let idx = metrics
            .frozen_column_at_x(x)
            .or_else(|| metrics.column_at_x(x + self.viewport.scroll_left));
        let Some(idx) = idx else {
            return HitTarget::None;
        };

        if y < self.config.header_row_height() {
            return HitTarget::Cell(Position::new(idx, HEADER_ROW_IDX));
        }
        let header_height = self.header_height();
        if y < header_height {
            return HitTarget::Filter(idx);
        }
        let summary_top = self.viewport.height - self.summary_rows_height();
        if self.summary_row_count > 0 && y >= summary_top {
            let summary_row =
                f32_to_index(((y - summary_top) / self.config.summary_row_height()).floor())
                    .min(self.summary_row_count - 1);
            return HitTarget::Summary { idx, summary_row };
        }

        let content_y = y - header_height + self.viewport.scroll_top;
        match self.row_heights().row_at_y(content_y, self.row_count) {
            Some(row) => match isize::try_from(row) {
                Ok(row_idx) => HitTarget::Cell(Position::new(idx, row_idx)),
                Err(_) => HitTarget::None,
            },
            None => HitTarget::None,
        }
    }

    /// Cell (header cells included) under viewport point `(x, y)`.
    pub fn cell_at_point(&mut self, x: f32, y: f32) -> Option<Position> {
        match self.hit_test(x, y) {
            HitTarget::Cell(position) => Some(position),
            _ => None,
        }
    }

    /// Handle a key press. `rows` is the host's current row data.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, rows: &[Row]) -> bool {
        if self.editor.is_some() {
            return self.handle_editor_key(key, shift, rows);
        }
        if !self.config.enable_cell_select {
            return false;
        }
        match key {
            "Escape" => {
                if self.fill_drag.take().is_some() {
                    return true;
                }
                self.click_outside()
            }
            "Enter" => self.activate(rows),
            "c" | "C" if ctrl => self.copy(rows),
            "v" | "V" if ctrl => self.paste_copied(rows),
            "a" | "A" if ctrl => {
                let bounds = self.grid_bounds();
                let transition = self.selection.select_all(bounds);
                self.report_transition(transition);
                true
            }
            _ => match parse_key(key, ctrl, shift) {
                Some(KeyIntent::Navigate(navigation)) => self.navigate(navigation),
                Some(KeyIntent::Extend(direction)) => {
                    let bounds = self.grid_bounds();
                    let handled = self.selection.state() != SelectionState::NoSelection;
                    let transition = self.selection.extend(direction, bounds);
                    self.apply_transition(transition);
                    handled
                }
                None => false,
            },
        }
    }

    /// Move the active cell. Arrows, Home/End and paging are consumed
    /// whenever a cell is active; Tab only when it moved, so focus can
    /// leave the grid at either end.
    pub fn navigate(&mut self, key: NavigationKey) -> bool {
        let bounds = self.grid_bounds();
        let metrics = self.metrics();
        let has_selection = self.selection.state() != SelectionState::NoSelection;
        let transition =
            self.selection
                .navigate(key, bounds, editable_check(&metrics, &self.host));
        let moved = transition.is_changed();
        self.apply_transition(transition);
        match key {
            NavigationKey::Tab | NavigationKey::ShiftTab => moved,
            _ => has_selection,
        }
    }

    fn handle_editor_key(&mut self, key: &str, shift: bool, rows: &[Row]) -> bool {
        match key {
            "Escape" => {
                self.cancel_edit();
                true
            }
            "Enter" => {
                self.commit_edit(rows);
                true
            }
            "Tab" => {
                self.commit_edit(rows);
                let key = if shift {
                    NavigationKey::ShiftTab
                } else {
                    NavigationKey::Tab
                };
                self.navigate(key);
                true
            }
            // Typing belongs to the editor widget
            _ => false,
        }
    }

    /// Enter on the active cell: sort from a header cell, edit a data cell.
    fn activate(&mut self, rows: &[Row]) -> bool {
        match self.selection.state() {
            SelectionState::CellActive(position) if position.is_header() => {
                self.toggle_sort(position.idx)
            }
            SelectionState::CellActive(position) => self.open_editor_at(position, rows),
            _ => false,
        }
    }

    /// Pointer pressed at viewport point `(x, y)`.
    pub fn pointer_down(&mut self, x: f32, y: f32, shift: bool, rows: &[Row]) -> bool {
        let hit = self.hit_test(x, y);
        let editing_elsewhere = self
            .editor
            .as_ref()
            .is_some_and(|session| hit != HitTarget::Cell(session.position));
        if editing_elsewhere {
            self.commit_edit(rows);
        }
        match hit {
            HitTarget::FillHandle => self.begin_fill_drag(),
            HitTarget::Cell(position) if position.is_header() => {
                let selected = self.config.enable_cell_select && self.click_cell(position, false);
                let sorted = self.toggle_sort(position.idx);
                selected || sorted
            }
            HitTarget::Cell(position) => {
                self.config.enable_cell_select && self.click_cell(position, shift)
            }
            HitTarget::Filter(_) | HitTarget::Summary { .. } => false,
            HitTarget::None => self.click_outside(),
        }
    }

    fn click_cell(&mut self, position: Position, shift: bool) -> bool {
        let bounds = self.grid_bounds();
        let metrics = self.metrics();
        let accept = editable_check(&metrics, &self.host);
        let transition = if shift {
            self.selection.shift_click(position, bounds, accept)
        } else {
            self.selection.pointer_down(position, bounds, accept)
        };
        let changed = transition.is_changed();
        self.apply_transition(transition);
        changed
    }

    /// Pointer moved while pressed: extend the range or the fill drag.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(position) = self.cell_at_point(x, y) else {
            return false;
        };
        if self.fill_drag.is_some() {
            return self.update_fill_drag(position);
        }
        if !self.selection.is_dragging() {
            return false;
        }
        let bounds = self.grid_bounds();
        let transition = self.selection.pointer_move(position, bounds);
        let changed = transition.is_changed();
        self.apply_transition(transition);
        changed
    }

    /// Pointer released: commit a range drag or finish a fill drag.
    pub fn pointer_up(&mut self, rows: &[Row]) -> bool {
        if self.fill_drag.is_some() {
            return self.end_fill_drag(rows);
        }
        let transition = self.selection.pointer_up();
        let changed = transition.is_changed();
        self.report_transition(transition);
        changed
    }

    /// Double click: fill down from the fill handle, or open the editor.
    pub fn double_click(&mut self, x: f32, y: f32, rows: &[Row]) -> bool {
        match self.hit_test(x, y) {
            HitTarget::FillHandle => self.fill_down(rows),
            HitTarget::Cell(position) if !position.is_header() => {
                self.open_editor_at(position, rows)
            }
            _ => false,
        }
    }

    /// Focus or click outside the grid clears the selection.
    pub fn click_outside(&mut self) -> bool {
        self.fill_drag = None;
        let transition = self.selection.clear();
        let changed = transition.is_changed();
        self.report_transition(transition);
        changed
    }

    /// Open the cell editor on a data cell. The cell becomes the active cell.
    /// Returns false for read-only cells.
    pub fn open_editor_at(&mut self, position: Position, rows: &[Row]) -> bool {
        let Some(row_idx) = position.data_row() else {
            return false;
        };
        let metrics = self.metrics();
        let (Some(column), Some(row)) = (metrics.get(position.idx), rows.get(row_idx)) else {
            return false;
        };
        if !column.column.editable || !self.host.is_cell_editable(row_idx, column) {
            return false;
        }
        let bounds = self.grid_bounds();
        let transition = self
            .selection
            .click(position, bounds, editable_check(&metrics, &self.host));
        self.apply_transition(transition);

        let original = row.get(column.key()).cloned().unwrap_or(Value::Null);
        debug!("editor opened at {position:?}");
        self.editor = Some(EditSession::new(position, original));
        true
    }

    /// Text the open editor should start with.
    pub fn editor_text(&mut self, rows: &[Row]) -> Option<String> {
        let position = self.editor.as_ref()?.position;
        let row_idx = position.data_row()?;
        let metrics = self.metrics();
        let ctx = CellContext::new(metrics.get(position.idx)?, rows.get(row_idx)?, row_idx);
        Some(self.cell_editor.initial_text(&ctx))
    }

    /// Update the draft from editor text, parsed by the cell editor.
    pub fn set_edit_text(&mut self, text: &str, rows: &[Row]) -> bool {
        let Some(position) = self.editor.as_ref().map(|session| session.position) else {
            return false;
        };
        let Some(row_idx) = position.data_row() else {
            return false;
        };
        let metrics = self.metrics();
        let (Some(column), Some(row)) = (metrics.get(position.idx), rows.get(row_idx)) else {
            return false;
        };
        let value = self
            .cell_editor
            .parse(&CellContext::new(column, row, row_idx), text);
        self.set_edit_value(value)
    }

    pub fn set_edit_value(&mut self, value: Value) -> bool {
        match self.editor.as_mut() {
            Some(session) => {
                session.value = value;
                true
            }
            None => false,
        }
    }

    /// Close the editor and emit a `CellUpdate` if the value changed.
    pub fn commit_edit(&mut self, rows: &[Row]) -> bool {
        let Some(session) = self.editor.take() else {
            return false;
        };
        if !session.is_dirty() {
            return false;
        }
        self.emit_update(rows, UpdateRequest::Edit(session.position, session.value))
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.take().is_some()
    }

    /// Copy the selection as TSV through `GridHost::on_copy`.
    pub fn copy(&mut self, rows: &[Row]) -> bool {
        let Some(range) = self.selection.state().cell_range() else {
            return false;
        };
        let metrics = self.metrics();
        let text = copy_range_text(rows, &metrics.columns, range);
        self.copied_range = Some(range);
        self.host.on_copy(text);
        true
    }

    /// Paste the last copied grid range into the selection.
    pub fn paste_copied(&mut self, rows: &[Row]) -> bool {
        let (Some(source), Some(destination)) =
            (self.copied_range, self.selection.state().cell_range())
        else {
            return false;
        };
        self.emit_update(
            rows,
            UpdateRequest::Paste {
                source,
                destination,
            },
        )
    }

    /// Paste clipboard text into the active cell or selected range.
    pub fn paste_text(&mut self, text: &str, rows: &[Row]) -> bool {
        let Some(destination) = self.selection.state().cell_range() else {
            return false;
        };
        self.emit_update(rows, UpdateRequest::PasteText { text, destination })
    }

    pub fn begin_fill_drag(&mut self) -> bool {
        let Some(source) = self.selection.state().cell_range() else {
            return false;
        };
        self.fill_drag = Some(FillDrag {
            source,
            destination: source,
        });
        true
    }

    /// Grow the fill destination to cover `position`.
    pub fn update_fill_drag(&mut self, position: Position) -> bool {
        let Some(drag) = self.fill_drag.as_mut() else {
            return false;
        };
        if position.is_header() {
            return false;
        }
        let source = drag.source;
        let destination = CellRange {
            top_left: Position::new(
                source.top_left.idx.min(position.idx),
                source.top_left.row_idx.min(position.row_idx),
            ),
            bottom_right: Position::new(
                source.bottom_right.idx.max(position.idx),
                source.bottom_right.row_idx.max(position.row_idx),
            ),
        };
        let changed = destination != drag.destination;
        drag.destination = destination;
        changed
    }

    pub fn fill_drag_destination(&self) -> Option<CellRange> {
        self.fill_drag.map(|drag| drag.destination)
    }

    /// Finish a fill drag, emitting one `CellDrag` update.
    pub fn end_fill_drag(&mut self, rows: &[Row]) -> bool {
        let Some(drag) = self.fill_drag.take() else {
            return false;
        };
        if drag.destination == drag.source {
            return false;
        }
        self.emit_update(
            rows,
            UpdateRequest::FillDrag {
                source: drag.source,
                destination: drag.destination,
            },
        )
    }

    /// Copy the active cell down to the last row (`ColumnFill`).
    pub fn fill_down(&mut self, rows: &[Row]) -> bool {
        let Some(source) = self
            .selection
            .state()
            .active_position()
            .filter(|position| !position.is_header())
        else {
            return false;
        };
        self.emit_update(rows, UpdateRequest::FillDown(source))
    }

    fn emit_update(&mut self, rows: &[Row], request: UpdateRequest<'_>) -> bool {
        let metrics = self.metrics();
        let host = &self.host;
        let check = |row: usize, column: &CalculatedColumn| host.is_cell_editable(row, column);
        let coalescer = UpdateCoalescer::new(&metrics.columns, rows, check);
        let event = match request {
            UpdateRequest::Edit(position, value) => coalescer.begin_edit(position, value),
            UpdateRequest::Paste {
                source,
                destination,
            } => coalescer.apply_paste(source, destination),
            UpdateRequest::PasteText { text, destination } => {
                coalescer.apply_paste_text(text, destination)
            }
            UpdateRequest::FillDrag {
                source,
                destination,
            } => coalescer.apply_fill_drag(source, destination),
            UpdateRequest::FillDown(source) => coalescer.apply_fill_down(source),
        };
        match event {
            Some(event) => {
                debug!(
                    "{:?}: {} cells in rows {}..={}",
                    event.action,
                    event.cell_count(),
                    event.from_row,
                    event.to_row
                );
                self.host.on_rows_update(event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(
            parse_key("ArrowLeft", false, false),
            Some(KeyIntent::Navigate(NavigationKey::Arrow(Direction::Left)))
        );
        assert_eq!(
            parse_key("ArrowLeft", false, true),
            Some(KeyIntent::Extend(Direction::Left))
        );
        assert_eq!(
            parse_key("Tab", false, true),
            Some(KeyIntent::Navigate(NavigationKey::ShiftTab))
        );
        assert_eq!(
            parse_key("End", true, false),
            Some(KeyIntent::Navigate(NavigationKey::CtrlEnd))
        );
        assert_eq!(parse_key("x", false, false), None);
    }
}

//! Selection state machine: the active cell, range selection, and the
//! transitions driven by pointer and keyboard input.
//!
//! The machine knows nothing about rendering or the host. Callers pass the
//! grid extent ([`GridBounds`]) and an acceptance check for data cells, and
//! act on the returned [`Transition`] (invoke callbacks, scroll into view).

mod navigation;

pub use navigation::{
    extend_step, next_position, step, CellNavigationMode, Direction, GridBounds, NavigationKey,
};

use crate::types::{CellRange, Position, SelectedRange};

/// Current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    NoSelection,
    /// A single active cell (possibly on the header row)
    CellActive(Position),
    /// A range being dragged out with the pointer held down
    RangeSelecting(SelectedRange),
    /// A committed range
    RangeSelected(SelectedRange),
}

impl SelectionState {
    /// The cell keyboard input acts on: the active cell, or a range's cursor.
    pub fn active_position(&self) -> Option<Position> {
        match self {
            Self::NoSelection => None,
            Self::CellActive(position) => Some(*position),
            Self::RangeSelecting(range) | Self::RangeSelected(range) => Some(range.cursor_cell),
        }
    }

    pub fn selected_range(&self) -> Option<SelectedRange> {
        match self {
            Self::RangeSelecting(range) | Self::RangeSelected(range) => Some(*range),
            _ => None,
        }
    }

    /// Data cells covered by the selection; an active data cell is 1x1.
    pub fn cell_range(&self) -> Option<CellRange> {
        match self {
            Self::NoSelection => None,
            Self::CellActive(position) if position.is_header() => None,
            Self::CellActive(position) => Some(CellRange::single(*position)),
            Self::RangeSelecting(range) | Self::RangeSelected(range) => Some(range.range()),
        }
    }
}

/// Result of feeding one input to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Input refused or had no effect
    Unchanged,
    Cell(Position),
    Range(SelectedRange),
    Cleared,
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// Cell to bring into view after this transition.
    pub fn scroll_target(&self) -> Option<Position> {
        match self {
            Self::Cell(position) => Some(*position),
            Self::Range(range) => Some(range.cursor_cell),
            Self::Unchanged | Self::Cleared => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStateMachine {
    state: SelectionState,
    mode: CellNavigationMode,
    /// Cell the pointer went down on while a drag is in progress
    drag_origin: Option<Position>,
}

impl SelectionStateMachine {
    pub fn new(mode: CellNavigationMode) -> Self {
        Self {
            state: SelectionState::NoSelection,
            mode,
            drag_origin: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn mode(&self) -> CellNavigationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CellNavigationMode) {
        self.mode = mode;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Activate a single cell. Header cells are always accepted; data cells
    /// must pass `accept`.
    pub fn click(
        &mut self,
        position: Position,
        bounds: GridBounds,
        accept: impl Fn(Position) -> bool,
    ) -> Transition {
        if !bounds.contains(position) || !(position.is_header() || accept(position)) {
            return Transition::Unchanged;
        }
        self.drag_origin = None;
        self.set(SelectionState::CellActive(position))
    }

    /// Select the range between the current anchor and `position`.
    ///
    /// Without an active data cell this behaves like a plain click.
    pub fn shift_click(
        &mut self,
        position: Position,
        bounds: GridBounds,
        accept: impl Fn(Position) -> bool,
    ) -> Transition {
        let anchor = match self.state {
            SelectionState::CellActive(active) if !active.is_header() => active,
            SelectionState::RangeSelected(range) => range.anchor(),
            _ => return self.click(position, bounds, accept),
        };
        if !bounds.contains_cell(position) || !accept(position) {
            return Transition::Unchanged;
        }
        self.drag_origin = None;
        self.set(Self::range_state(anchor, position, false))
    }

    /// Pointer pressed on a cell: activate it and arm a range drag.
    pub fn pointer_down(
        &mut self,
        position: Position,
        bounds: GridBounds,
        accept: impl Fn(Position) -> bool,
    ) -> Transition {
        let transition = self.click(position, bounds, accept);
        if self.state == SelectionState::CellActive(position) && !position.is_header() {
            self.drag_origin = Some(position);
        }
        transition
    }

    /// Pointer moved over a cell while pressed.
    pub fn pointer_move(&mut self, position: Position, bounds: GridBounds) -> Transition {
        let Some(origin) = self.drag_origin else {
            return Transition::Unchanged;
        };
        if !bounds.contains_cell(position) {
            return Transition::Unchanged;
        }
        self.set(Self::range_state(origin, position, true))
    }

    /// Pointer released: commit a range being dragged out.
    pub fn pointer_up(&mut self) -> Transition {
        self.drag_origin = None;
        match self.state {
            SelectionState::RangeSelecting(range) => {
                self.set(SelectionState::RangeSelected(range))
            }
            _ => Transition::Unchanged,
        }
    }

    /// Move the active cell. A committed range collapses to a single cell
    /// moved from its cursor. Nothing happens without a selection.
    pub fn navigate(
        &mut self,
        key: NavigationKey,
        bounds: GridBounds,
        accept: impl Fn(Position) -> bool,
    ) -> Transition {
        let Some(from) = self.state.active_position() else {
            return Transition::Unchanged;
        };
        let Some(target) = next_position(from, key, self.mode, bounds) else {
            return Transition::Unchanged;
        };
        if !target.is_header() && !accept(target) {
            log::trace!("navigation to {target:?} refused");
            return Transition::Unchanged;
        }
        self.drag_origin = None;
        self.set(SelectionState::CellActive(target))
    }

    /// Grow or shrink the selection by moving its cursor one cell.
    pub fn extend(&mut self, direction: Direction, bounds: GridBounds) -> Transition {
        let (anchor, cursor) = match self.state {
            SelectionState::CellActive(active) if !active.is_header() => (active, active),
            SelectionState::RangeSelecting(range) | SelectionState::RangeSelected(range) => {
                (range.anchor(), range.cursor_cell)
            }
            _ => return Transition::Unchanged,
        };
        match extend_step(cursor, direction, bounds) {
            Some(next) => self.set(Self::range_state(anchor, next, false)),
            None => Transition::Unchanged,
        }
    }

    /// Select every data cell, cursor on the last one.
    pub fn select_all(&mut self, bounds: GridBounds) -> Transition {
        let (Some(last_idx), Some(last_row)) = (
            bounds.column_count.checked_sub(1),
            bounds
                .row_count
                .checked_sub(1)
                .and_then(|row| isize::try_from(row).ok()),
        ) else {
            return Transition::Unchanged;
        };
        self.drag_origin = None;
        self.set(Self::range_state(
            Position::new(0, 0),
            Position::new(last_idx, last_row),
            false,
        ))
    }

    pub fn clear(&mut self) -> Transition {
        self.drag_origin = None;
        self.set(SelectionState::NoSelection)
    }

    /// Drop a selection that no longer fits after rows or columns shrank.
    pub fn clamp_to(&mut self, bounds: GridBounds) -> Transition {
        let fits = match self.state {
            SelectionState::NoSelection => true,
            SelectionState::CellActive(position) => bounds.contains(position),
            SelectionState::RangeSelecting(range) | SelectionState::RangeSelected(range) => {
                bounds.contains_cell(range.bottom_right)
            }
        };
        if fits {
            Transition::Unchanged
        } else {
            log::debug!("selection {:?} out of bounds, clearing", self.state);
            self.clear()
        }
    }

    fn range_state(anchor: Position, cursor: Position, selecting: bool) -> SelectionState {
        if anchor == cursor {
            SelectionState::CellActive(anchor)
        } else if selecting {
            SelectionState::RangeSelecting(SelectedRange::between(anchor, cursor))
        } else {
            SelectionState::RangeSelected(SelectedRange::between(anchor, cursor))
        }
    }

    fn set(&mut self, next: SelectionState) -> Transition {
        if next == self.state {
            return Transition::Unchanged;
        }
        log::trace!("selection {:?} -> {next:?}", self.state);
        self.state = next;
        match next {
            SelectionState::NoSelection => Transition::Cleared,
            SelectionState::CellActive(position) => Transition::Cell(position),
            SelectionState::RangeSelecting(range) | SelectionState::RangeSelected(range) => {
                Transition::Range(range)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::HEADER_ROW_IDX;

    fn bounds() -> GridBounds {
        GridBounds::new(5, 10).with_page_size(3)
    }

    fn any(_: Position) -> bool {
        true
    }

    fn active(idx: usize, row_idx: isize) -> SelectionStateMachine {
        let mut machine = SelectionStateMachine::default();
        machine.click(Position::new(idx, row_idx), bounds(), any);
        machine
    }

    #[test]
    fn test_click_activates_cell() {
        let mut machine = SelectionStateMachine::default();
        let transition = machine.click(Position::new(1, 2), bounds(), any);
        assert_eq!(transition, Transition::Cell(Position::new(1, 2)));
        assert_eq!(machine.state(), SelectionState::CellActive(Position::new(1, 2)));
        // Clicking the same cell again is not a transition
        assert_eq!(machine.click(Position::new(1, 2), bounds(), any), Transition::Unchanged);
    }

    #[test]
    fn test_refused_click_keeps_state() {
        let mut machine = active(0, 0);
        let transition = machine.click(Position::new(3, 3), bounds(), |p| p.idx != 3);
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(machine.state(), SelectionState::CellActive(Position::new(0, 0)));
    }

    #[test]
    fn test_header_click_ignores_editable_check() {
        let mut machine = SelectionStateMachine::default();
        let transition = machine.click(Position::new(2, HEADER_ROW_IDX), bounds(), |_| false);
        assert_eq!(transition, Transition::Cell(Position::new(2, HEADER_ROW_IDX)));
    }

    #[test]
    fn test_out_of_bounds_click() {
        let mut machine = SelectionStateMachine::default();
        assert_eq!(machine.click(Position::new(5, 0), bounds(), any), Transition::Unchanged);
        assert_eq!(machine.state(), SelectionState::NoSelection);
    }

    #[test]
    fn test_shift_click_selects_range() {
        let mut machine = active(3, 4);
        let transition = machine.shift_click(Position::new(1, 1), bounds(), any);
        let expected = SelectedRange::between(Position::new(3, 4), Position::new(1, 1));
        assert_eq!(transition, Transition::Range(expected));
        assert_eq!(expected.top_left, Position::new(1, 1));
        assert_eq!(expected.bottom_right, Position::new(3, 4));

        // A second shift click keeps the original anchor
        machine.shift_click(Position::new(4, 6), bounds(), any);
        let range = machine.state().selected_range().unwrap();
        assert_eq!(range.top_left, Position::new(3, 4));
        assert_eq!(range.bottom_right, Position::new(4, 6));
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut machine = SelectionStateMachine::default();
        machine.pointer_down(Position::new(1, 1), bounds(), any);
        assert!(machine.is_dragging());

        let transition = machine.pointer_move(Position::new(3, 2), bounds());
        assert!(matches!(transition, Transition::Range(_)));
        assert!(matches!(machine.state(), SelectionState::RangeSelecting(_)));

        let transition = machine.pointer_up();
        assert!(matches!(transition, Transition::Range(_)));
        let SelectionState::RangeSelected(range) = machine.state() else {
            panic!("expected committed range");
        };
        assert_eq!(range.cursor_cell, Position::new(3, 2));
        assert!(!machine.is_dragging());
    }

    #[test]
    fn test_drag_within_start_cell_stays_active() {
        let mut machine = SelectionStateMachine::default();
        machine.pointer_down(Position::new(1, 1), bounds(), any);
        assert_eq!(machine.pointer_move(Position::new(1, 1), bounds()), Transition::Unchanged);
        assert_eq!(machine.pointer_up(), Transition::Unchanged);
        assert_eq!(machine.state(), SelectionState::CellActive(Position::new(1, 1)));
    }

    #[test]
    fn test_pointer_move_without_drag() {
        let mut machine = active(0, 0);
        assert_eq!(machine.pointer_move(Position::new(2, 2), bounds()), Transition::Unchanged);
    }

    #[test]
    fn test_navigation_refused_into_locked_cell() {
        let mut machine = active(0, 0);
        let transition = machine.navigate(
            NavigationKey::Arrow(Direction::Right),
            bounds(),
            |p| p.idx != 1,
        );
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(machine.state().active_position(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_navigation_without_selection() {
        let mut machine = SelectionStateMachine::default();
        let transition = machine.navigate(NavigationKey::Arrow(Direction::Down), bounds(), any);
        assert_eq!(transition, Transition::Unchanged);
    }

    #[test]
    fn test_arrow_collapses_range_from_cursor() {
        let mut machine = active(1, 1);
        machine.shift_click(Position::new(3, 3), bounds(), any);
        let transition = machine.navigate(NavigationKey::Arrow(Direction::Right), bounds(), any);
        assert_eq!(transition, Transition::Cell(Position::new(4, 3)));
    }

    #[test]
    fn test_extend_and_shrink() {
        let mut machine = active(2, 2);
        machine.extend(Direction::Right, bounds());
        machine.extend(Direction::Down, bounds());
        let range = machine.state().selected_range().unwrap();
        assert_eq!(range.top_left, Position::new(2, 2));
        assert_eq!(range.bottom_right, Position::new(3, 3));

        // Crossing back over the anchor re-normalizes
        machine.extend(Direction::Left, bounds());
        machine.extend(Direction::Left, bounds());
        let range = machine.state().selected_range().unwrap();
        assert_eq!(range.top_left, Position::new(1, 2));
        assert_eq!(range.bottom_right, Position::new(2, 3));
        assert_eq!(range.cursor_cell, Position::new(1, 3));

        machine.extend(Direction::Up, bounds());
        machine.extend(Direction::Right, bounds());
        assert_eq!(machine.state(), SelectionState::CellActive(Position::new(2, 2)));
    }

    #[test]
    fn test_extend_clamped_at_edges() {
        let mut machine = active(4, 0);
        assert_eq!(machine.extend(Direction::Right, bounds()), Transition::Unchanged);
        assert_eq!(machine.extend(Direction::Up, bounds()), Transition::Unchanged);
    }

    #[test]
    fn test_header_cell_cannot_extend() {
        let mut machine = active(1, HEADER_ROW_IDX);
        assert_eq!(machine.extend(Direction::Down, bounds()), Transition::Unchanged);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut machine = SelectionStateMachine::default();
        machine.select_all(bounds());
        let range = machine.state().cell_range().unwrap();
        assert_eq!(range.width(), 5);
        assert_eq!(range.height(), 10);

        assert_eq!(machine.clear(), Transition::Cleared);
        assert_eq!(machine.clear(), Transition::Unchanged);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut machine = active(4, 9);
        assert_eq!(machine.clamp_to(GridBounds::new(5, 10)), Transition::Unchanged);
        assert_eq!(machine.clamp_to(GridBounds::new(5, 5)), Transition::Cleared);
    }
}

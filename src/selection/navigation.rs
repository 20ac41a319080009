//! Pure cell navigation: where a key press moves a position.

use serde::{Deserialize, Serialize};

use crate::types::{Position, HEADER_ROW_IDX};

/// What happens when horizontal/vertical navigation reaches a grid edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellNavigationMode {
    /// Stay on the edge cell
    #[default]
    None,
    /// Wrap to the opposite edge of the current row or column
    Loop,
    /// Past the last column go to the first column of the next row, and
    /// before the first column to the last column of the previous row
    ChangeRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A navigation intent, independent of DOM key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Arrow(Direction),
    Tab,
    ShiftTab,
    /// First column of the current row
    Home,
    /// Last column of the current row
    End,
    /// First cell of the grid
    CtrlHome,
    /// Last cell of the grid
    CtrlEnd,
    PageUp,
    PageDown,
}

/// Extent of the grid as seen by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub column_count: usize,
    pub row_count: usize,
    /// Rows moved by PageUp/PageDown
    pub page_size: usize,
}

impl GridBounds {
    pub fn new(column_count: usize, row_count: usize) -> Self {
        Self {
            column_count,
            row_count,
            page_size: 1,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn contains(&self, position: Position) -> bool {
        position.is_within(self.column_count, self.row_count)
    }

    /// Whether the position is a data cell (not the header row).
    pub fn contains_cell(&self, position: Position) -> bool {
        !position.is_header() && self.contains(position)
    }

    fn last_column(&self) -> Option<usize> {
        self.column_count.checked_sub(1)
    }

    fn last_row(&self) -> Option<isize> {
        self.row_count
            .checked_sub(1)
            .and_then(|row| isize::try_from(row).ok())
    }
}

/// Position reached by `key` from `from`, or `None` when nothing moves
/// (edge under [`CellNavigationMode::None`], or Tab past the last cell).
pub fn next_position(
    from: Position,
    key: NavigationKey,
    mode: CellNavigationMode,
    bounds: GridBounds,
) -> Option<Position> {
    let last_column = bounds.last_column()?;
    let target = match key {
        NavigationKey::Arrow(direction) => step(from, direction, mode, bounds)?,
        NavigationKey::Tab => {
            step(from, Direction::Right, CellNavigationMode::ChangeRow, bounds)?
        }
        NavigationKey::ShiftTab => {
            step(from, Direction::Left, CellNavigationMode::ChangeRow, bounds)?
        }
        NavigationKey::Home => Position::new(0, from.row_idx),
        NavigationKey::End => Position::new(last_column, from.row_idx),
        NavigationKey::CtrlHome => {
            let row = if bounds.row_count == 0 { HEADER_ROW_IDX } else { 0 };
            Position::new(0, row)
        }
        NavigationKey::CtrlEnd => {
            Position::new(last_column, bounds.last_row().unwrap_or(HEADER_ROW_IDX))
        }
        NavigationKey::PageDown => {
            let last_row = bounds.last_row()?;
            let page = isize::try_from(bounds.page_size).unwrap_or(isize::MAX);
            Position::new(from.idx, from.row_idx.saturating_add(page).min(last_row))
        }
        NavigationKey::PageUp => {
            if from.row_idx <= 0 {
                return None;
            }
            let page = isize::try_from(bounds.page_size).unwrap_or(isize::MAX);
            Position::new(from.idx, from.row_idx.saturating_sub(page).max(0))
        }
    };
    (target != from && bounds.contains(target)).then_some(target)
}

/// One step in `direction`, resolving grid edges with `mode`.
pub fn step(
    from: Position,
    direction: Direction,
    mode: CellNavigationMode,
    bounds: GridBounds,
) -> Option<Position> {
    let last_column = bounds.last_column()?;
    match direction {
        Direction::Right if from.idx < last_column => {
            Some(Position::new(from.idx + 1, from.row_idx))
        }
        Direction::Left if from.idx > 0 => Some(Position::new(from.idx - 1, from.row_idx)),
        Direction::Down if bounds.last_row().is_some_and(|last| from.row_idx < last) => {
            Some(Position::new(from.idx, from.row_idx + 1))
        }
        Direction::Up if from.row_idx > HEADER_ROW_IDX => {
            Some(Position::new(from.idx, from.row_idx - 1))
        }
        // At an edge
        Direction::Right => match mode {
            CellNavigationMode::None => None,
            CellNavigationMode::Loop => Some(Position::new(0, from.row_idx)),
            CellNavigationMode::ChangeRow => {
                let next_row = from.row_idx + 1;
                let has_next =
                    from.row_idx >= 0 && bounds.last_row().is_some_and(|last| next_row <= last);
                has_next.then_some(Position::new(0, next_row))
            }
        },
        Direction::Left => match mode {
            CellNavigationMode::None => None,
            CellNavigationMode::Loop => Some(Position::new(last_column, from.row_idx)),
            CellNavigationMode::ChangeRow => {
                (from.row_idx > 0).then_some(Position::new(last_column, from.row_idx - 1))
            }
        },
        Direction::Down => match mode {
            CellNavigationMode::Loop => Some(Position::new(from.idx, HEADER_ROW_IDX)),
            _ => None,
        },
        Direction::Up => match mode {
            CellNavigationMode::Loop => bounds
                .last_row()
                .map(|last| Position::new(from.idx, last)),
            _ => None,
        },
    }
}

/// One step of range extension: clamped to data cells, never wrapping.
pub fn extend_step(cursor: Position, direction: Direction, bounds: GridBounds) -> Option<Position> {
    let target = step(cursor, direction, CellNavigationMode::None, bounds)?;
    bounds.contains_cell(target).then_some(target)
}

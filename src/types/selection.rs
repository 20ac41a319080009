use serde::{Deserialize, Serialize};

/// Row index used for the header-row focus state.
pub const HEADER_ROW_IDX: isize = -1;

/// A single cell address.
///
/// `idx` is the column index in calculated order. `row_idx` is the row index,
/// or [`HEADER_ROW_IDX`] when keyboard focus sits on the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub idx: usize,
    pub row_idx: isize,
}

impl Position {
    pub const fn new(idx: usize, row_idx: isize) -> Self {
        Self { idx, row_idx }
    }

    pub fn is_header(&self) -> bool {
        self.row_idx == HEADER_ROW_IDX
    }

    /// Data row index, `None` for the header row.
    pub fn data_row(&self) -> Option<usize> {
        usize::try_from(self.row_idx).ok()
    }

    /// Whether the position addresses a cell of a grid with the given extent.
    pub fn is_within(&self, column_count: usize, row_count: usize) -> bool {
        self.idx < column_count
            && self.row_idx >= HEADER_ROW_IDX
            && self.data_row().map_or(true, |row| row < row_count)
    }
}

/// A normalized rectangle of data cells (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub top_left: Position,
    pub bottom_right: Position,
}

impl CellRange {
    /// Build a normalized range from two arbitrary corners.
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            top_left: Position::new(a.idx.min(b.idx), a.row_idx.min(b.row_idx)),
            bottom_right: Position::new(a.idx.max(b.idx), a.row_idx.max(b.row_idx)),
        }
    }

    pub fn single(position: Position) -> Self {
        Self {
            top_left: position,
            bottom_right: position,
        }
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        self.bottom_right.idx - self.top_left.idx + 1
    }

    /// Number of rows covered
    pub fn height(&self) -> usize {
        usize::try_from(self.bottom_right.row_idx - self.top_left.row_idx + 1).unwrap_or(0)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.idx >= self.top_left.idx
            && position.idx <= self.bottom_right.idx
            && position.row_idx >= self.top_left.row_idx
            && position.row_idx <= self.bottom_right.row_idx
    }

    pub fn is_single_cell(&self) -> bool {
        self.top_left == self.bottom_right
    }
}

/// A selected rectangle plus the corner the user is extending from.
///
/// The anchor is always the corner diagonally opposite `cursor_cell`, so a
/// range can grow or shrink in any direction without storing it separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRange {
    pub top_left: Position,
    pub bottom_right: Position,
    pub cursor_cell: Position,
}

impl SelectedRange {
    /// Range spanning `anchor` and `cursor`, normalized.
    pub fn between(anchor: Position, cursor: Position) -> Self {
        let range = CellRange::from_corners(anchor, cursor);
        Self {
            top_left: range.top_left,
            bottom_right: range.bottom_right,
            cursor_cell: cursor,
        }
    }

    /// The fixed corner opposite the cursor.
    pub fn anchor(&self) -> Position {
        let idx = if self.cursor_cell.idx == self.top_left.idx {
            self.bottom_right.idx
        } else {
            self.top_left.idx
        };
        let row_idx = if self.cursor_cell.row_idx == self.top_left.row_idx {
            self.bottom_right.row_idx
        } else {
            self.top_left.row_idx
        };
        Position::new(idx, row_idx)
    }

    pub fn range(&self) -> CellRange {
        CellRange {
            top_left: self.top_left,
            bottom_right: self.bottom_right,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_between_normalizes_any_direction() {
        let range = SelectedRange::between(Position::new(4, 9), Position::new(1, 2));
        assert_eq!(range.top_left, Position::new(1, 2));
        assert_eq!(range.bottom_right, Position::new(4, 9));
        assert_eq!(range.cursor_cell, Position::new(1, 2));
        assert_eq!(range.anchor(), Position::new(4, 9));
    }

    #[test]
    fn test_anchor_of_mixed_corner() {
        // Cursor at top-right, anchor must be bottom-left
        let range = SelectedRange::between(Position::new(0, 5), Position::new(3, 1));
        assert_eq!(range.anchor(), Position::new(0, 5));
        assert_eq!(range.top_left, Position::new(0, 1));
        assert_eq!(range.bottom_right, Position::new(3, 5));
    }

    #[test]
    fn test_cell_range_extent() {
        let range = CellRange::from_corners(Position::new(2, 3), Position::new(0, 0));
        assert_eq!(range.width(), 3);
        assert_eq!(range.height(), 4);
        assert!(range.contains(Position::new(1, 2)));
        assert!(!range.contains(Position::new(3, 2)));
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, HEADER_ROW_IDX).is_within(3, 0));
        assert!(Position::new(2, 9).is_within(3, 10));
        assert!(!Position::new(3, 0).is_within(3, 10));
        assert!(!Position::new(0, 10).is_within(3, 10));
        assert!(!Position::new(0, -2).is_within(3, 10));
    }
}

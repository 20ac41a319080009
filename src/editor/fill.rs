//! Geometry for paste and fill: tiling a source block over a destination.

use crate::types::{CellRange, Position};

/// Grid extent used to clip destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub column_count: usize,
    pub row_count: usize,
}

impl Extent {
    /// Clip a range to the data cells of the grid. Ranges starting on the
    /// header row or outside the grid are rejected.
    pub fn clip(&self, range: CellRange) -> Option<CellRange> {
        let last_idx = self.column_count.checked_sub(1)?;
        let last_row = isize::try_from(self.row_count.checked_sub(1)?).ok()?;
        let top_left = range.top_left;
        if top_left.row_idx < 0 || top_left.idx > last_idx || top_left.row_idx > last_row {
            return None;
        }
        Some(CellRange {
            top_left,
            bottom_right: Position::new(
                range.bottom_right.idx.min(last_idx),
                range.bottom_right.row_idx.min(last_row),
            ),
        })
    }
}

/// Destination of a paste: a single target cell grows to the size of the
/// pasted block; a larger selection is used as is.
pub fn paste_destination(destination: CellRange, width: usize, height: usize) -> CellRange {
    if !destination.is_single_cell() || width == 0 || height == 0 {
        return destination;
    }
    let top_left = destination.top_left;
    let rows = isize::try_from(height - 1).unwrap_or(isize::MAX);
    CellRange {
        top_left,
        bottom_right: Position::new(
            top_left.idx.saturating_add(width - 1),
            top_left.row_idx.saturating_add(rows),
        ),
    }
}

/// Offset into a `width` x `height` block repeated from `anchor`, for the
/// cell at `target`. Works on either side of the anchor.
pub fn tile_offset(
    anchor: Position,
    target: Position,
    width: usize,
    height: usize,
) -> (usize, usize) {
    let col = wrap_usize(target.idx, anchor.idx, width);
    let row = isize::try_from(height)
        .ok()
        .filter(|&h| h > 0)
        .and_then(|h| usize::try_from((target.row_idx - anchor.row_idx).rem_euclid(h)).ok())
        .unwrap_or(0);
    (col, row)
}

fn wrap_usize(value: usize, anchor: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if value >= anchor {
        (value - anchor) % len
    } else {
        (len - (anchor - value) % len) % len
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn range(a: (usize, isize), b: (usize, isize)) -> CellRange {
        CellRange::from_corners(Position::new(a.0, a.1), Position::new(b.0, b.1))
    }

    #[test]
    fn test_single_cell_destination_expands() {
        let dest = paste_destination(range((1, 2), (1, 2)), 3, 2);
        assert_eq!(dest, range((1, 2), (3, 3)));
    }

    #[test]
    fn test_larger_destination_kept() {
        let dest = range((0, 0), (0, 3));
        assert_eq!(paste_destination(dest, 1, 2), dest);
    }

    #[test]
    fn test_clip_to_extent() {
        let extent = Extent {
            column_count: 3,
            row_count: 5,
        };
        assert_eq!(extent.clip(range((1, 3), (6, 9))), Some(range((1, 3), (2, 4))));
        assert_eq!(extent.clip(range((3, 0), (4, 0))), None);
        assert_eq!(extent.clip(range((0, -1), (0, 2))), None);
    }

    #[test]
    fn test_tile_offset_both_sides_of_anchor() {
        let anchor = Position::new(2, 4);
        assert_eq!(tile_offset(anchor, Position::new(2, 4), 1, 2), (0, 0));
        assert_eq!(tile_offset(anchor, Position::new(2, 7), 1, 2), (0, 1));
        // Above the anchor the pattern continues backwards
        assert_eq!(tile_offset(anchor, Position::new(2, 3), 1, 2), (0, 1));
        assert_eq!(tile_offset(anchor, Position::new(0, 4), 3, 1), (1, 0));
    }
}

//! Row geometry.
//!
//! Fixed-height rows are pure arithmetic. Variable-height rows keep
//! pre-computed cumulative offsets so every lookup is an O(log n) binary
//! search, never a scan over the rows.

/// Cumulative row positions (`offsets[i]` = y of row i's top edge, plus a
/// final entry for the bottom edge of the last row).
#[derive(Debug, Clone, PartialEq)]
pub struct RowOffsets {
    offsets: Vec<f32>,
}

impl RowOffsets {
    /// Build offsets from per-row heights. Negative or non-finite heights
    /// are treated as zero (collapsed rows).
    pub fn from_heights(heights: &[f32]) -> Self {
        let mut offsets = Vec::with_capacity(heights.len() + 1);
        let mut y: f32 = 0.0;
        for &h in heights {
            offsets.push(y);
            if h.is_finite() && h > 0.0 {
                y += h;
            }
        }
        offsets.push(y); // Final edge
        Self { offsets }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_height(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    pub fn row_top(&self, row: usize) -> f32 {
        self.offsets
            .get(row.min(self.len()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row_height(&self, row: usize) -> f32 {
        match (self.offsets.get(row), self.offsets.get(row + 1)) {
            (Some(top), Some(bottom)) => bottom - top,
            _ => 0.0,
        }
    }

    /// Row containing y (binary search), `None` outside `[0, total_height)`.
    pub fn row_at_y(&self, y: f32) -> Option<usize> {
        if y < 0.0 || y >= self.total_height() {
            return None;
        }
        // First edge strictly past y, minus one, is the containing row
        let idx = self.offsets.partition_point(|&top| top <= y);
        Some(idx.saturating_sub(1).min(self.len().saturating_sub(1)))
    }

    /// Number of rows whose top edge lies strictly above y.
    fn rows_starting_before(&self, y: f32) -> usize {
        self.offsets
            .partition_point(|&top| top < y)
            .min(self.len())
    }

    /// Number of rows whose bottom edge lies at or above y.
    fn rows_ending_by(&self, y: f32) -> usize {
        self.offsets
            .get(1..)
            .map_or(0, |bottoms| bottoms.partition_point(|&bottom| bottom <= y))
    }
}

/// Height model for the scrollable body rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RowHeights {
    /// Every row has the same height
    Fixed(f32),
    /// Per-row heights, as cumulative offsets
    Variable(RowOffsets),
}

impl RowHeights {
    pub fn row_top(&self, row: usize) -> f32 {
        match self {
            Self::Fixed(h) => index_to_f32(row) * h,
            Self::Variable(offsets) => offsets.row_top(row),
        }
    }

    pub fn row_height(&self, row: usize) -> f32 {
        match self {
            Self::Fixed(h) => *h,
            Self::Variable(offsets) => offsets.row_height(row),
        }
    }

    pub fn total_height(&self, row_count: usize) -> f32 {
        match self {
            Self::Fixed(h) => index_to_f32(row_count) * h,
            Self::Variable(offsets) => offsets.row_top(row_count),
        }
    }

    /// Row containing content y coordinate `y`, if any.
    pub fn row_at_y(&self, y: f32, row_count: usize) -> Option<usize> {
        if y < 0.0 || row_count == 0 {
            return None;
        }
        match self {
            Self::Fixed(h) if *h > 0.0 => {
                let row = f32_to_index((y / h).floor());
                (row < row_count).then_some(row)
            }
            Self::Fixed(_) => None,
            Self::Variable(offsets) => offsets.row_at_y(y).filter(|&row| row < row_count),
        }
    }

    /// Number of rows lying entirely inside `[top, top + height)`.
    pub fn fully_visible_rows(&self, row_count: usize, top: f32, height: f32) -> usize {
        if row_count == 0 || height.is_nan() || height <= 0.0 {
            return 0;
        }
        let top = top.max(0.0);
        let first = self.rows_starting_before(top).min(row_count);
        let end = self.first_row_ending_after(top + height).min(row_count);
        end.saturating_sub(first)
    }

    /// First row whose bottom edge is below y.
    pub(crate) fn first_row_ending_after(&self, y: f32) -> usize {
        match self {
            Self::Fixed(h) if *h > 0.0 => f32_to_index((y / h).floor()),
            Self::Fixed(_) => 0,
            Self::Variable(offsets) => offsets.rows_ending_by(y),
        }
    }

    /// Number of rows whose top edge is above y.
    pub(crate) fn rows_starting_before(&self, y: f32) -> usize {
        match self {
            Self::Fixed(h) if *h > 0.0 => f32_to_index((y / h).ceil()),
            Self::Fixed(_) => 0,
            Self::Variable(offsets) => offsets.rows_starting_before(y),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn index_to_f32(idx: usize) -> f32 {
    idx as f32
}

/// Convert a non-negative whole pixel quotient to an index, saturating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn f32_to_index(value: f32) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as usize
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

    #[test]
    fn test_offsets() {
        let offsets = RowOffsets::from_heights(&[10.0, 20.0, 30.0]);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets.total_height(), 60.0);
        assert_eq!(offsets.row_top(2), 30.0);
        assert_eq!(offsets.row_height(1), 20.0);
        assert_eq!(offsets.row_height(3), 0.0);
    }

    #[test]
    fn test_row_at_y() {
        let offsets = RowOffsets::from_heights(&[10.0, 20.0, 30.0]);
        assert_eq!(offsets.row_at_y(0.0), Some(0));
        assert_eq!(offsets.row_at_y(9.9), Some(0));
        assert_eq!(offsets.row_at_y(10.0), Some(1));
        assert_eq!(offsets.row_at_y(59.0), Some(2));
        assert_eq!(offsets.row_at_y(60.0), None);
        assert_eq!(offsets.row_at_y(-1.0), None);
    }

    #[test]
    fn test_collapsed_rows() {
        let offsets = RowOffsets::from_heights(&[10.0, 0.0, -5.0, 10.0]);
        assert_eq!(offsets.total_height(), 20.0);
        assert_eq!(offsets.row_height(1), 0.0);
        assert_eq!(offsets.row_height(2), 0.0);
        assert_eq!(offsets.row_at_y(10.0), Some(3));
    }

    #[test]
    fn test_fixed_heights() {
        let heights = RowHeights::Fixed(35.0);
        assert_eq!(heights.row_top(3), 105.0);
        assert_eq!(heights.total_height(10), 350.0);
        assert_eq!(heights.row_at_y(34.9, 10), Some(0));
        assert_eq!(heights.row_at_y(35.0, 10), Some(1));
        assert_eq!(heights.row_at_y(350.0, 10), None);
    }

    #[test]
    fn test_fully_visible_rows() {
        let fixed = RowHeights::Fixed(35.0);
        assert_eq!(fixed.fully_visible_rows(100, 0.0, 350.0), 10);
        // Rows 0 and 10 are cut off
        assert_eq!(fixed.fully_visible_rows(100, 10.0, 350.0), 9);
        assert_eq!(fixed.fully_visible_rows(4, 0.0, 350.0), 4);
        assert_eq!(fixed.fully_visible_rows(0, 0.0, 350.0), 0);

        // Tops 0, 100, 150, 350; bottom 380
        let offsets = RowOffsets::from_heights(&[100.0, 50.0, 200.0, 30.0]);
        let variable = RowHeights::Variable(offsets);
        assert_eq!(variable.fully_visible_rows(4, 0.0, 200.0), 2);
        assert_eq!(variable.fully_visible_rows(4, 100.0, 280.0), 3);
        assert_eq!(variable.fully_visible_rows(4, 0.0, 50.0), 0);
    }
}

//! Imperative handle for hosts that drive the grid from outside events.

use super::{editable_check, GridHost, ViewportController};
use crate::error::{GridError, Result};
use crate::types::{Position, Row};

/// Commands a host may issue directly.
pub trait GridHandle {
    /// Scroll a column into view at its nearest edge.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] for an index past the last column.
    fn scroll_to_column(&mut self, idx: usize) -> Result<()>;

    /// Scroll a row into view at its nearest edge.
    ///
    /// # Errors
    /// Returns [`GridError::PositionOutOfBounds`] for a row past the last row.
    fn scroll_to_row(&mut self, row_idx: usize) -> Result<()>;

    /// Make a cell active, as a click would. Cells refused by the editable
    /// check leave the selection unchanged.
    ///
    /// # Errors
    /// Returns [`GridError::PositionOutOfBounds`] outside the grid.
    fn select_cell(&mut self, position: Position) -> Result<()>;

    /// Select a cell and open its editor. Returns whether the editor opened.
    ///
    /// # Errors
    /// Returns [`GridError::PositionOutOfBounds`] outside the grid.
    fn open_cell_editor(&mut self, position: Position, rows: &[Row]) -> Result<bool>;
}

impl<H: GridHost> ViewportController<H> {
    fn check_position(&mut self, position: Position) -> Result<()> {
        if self.grid_bounds().contains(position) {
            Ok(())
        } else {
            Err(GridError::PositionOutOfBounds {
                idx: position.idx,
                row_idx: position.row_idx,
            })
        }
    }
}

impl<H: GridHost> GridHandle for ViewportController<H> {
    fn scroll_to_column(&mut self, idx: usize) -> Result<()> {
        let metrics = self.metrics();
        let column = metrics
            .get(idx)
            .ok_or_else(|| GridError::UnknownColumn(format!("#{idx}")))?;
        let scroll_left = self.viewport.scroll_left_for_column(
            column.left,
            column.width,
            column.is_frozen(),
            metrics.total_frozen_width,
        );
        let scroll_top = self.viewport.scroll_top;
        self.handle_scroll(scroll_left, scroll_top);
        Ok(())
    }

    fn scroll_to_row(&mut self, row_idx: usize) -> Result<()> {
        if row_idx >= self.row_count {
            return Err(GridError::PositionOutOfBounds {
                idx: 0,
                row_idx: isize::try_from(row_idx).unwrap_or(isize::MAX),
            });
        }
        let heights = self.row_heights();
        let scroll_top = self.viewport.scroll_top_for_row(
            heights.row_top(row_idx),
            heights.row_height(row_idx),
            self.body_height(),
        );
        let scroll_left = self.viewport.scroll_left;
        self.handle_scroll(scroll_left, scroll_top);
        Ok(())
    }

    fn select_cell(&mut self, position: Position) -> Result<()> {
        self.check_position(position)?;
        let bounds = self.grid_bounds();
        let metrics = self.metrics();
        let transition = self
            .selection
            .click(position, bounds, editable_check(&metrics, &self.host));
        self.apply_transition(transition);
        Ok(())
    }

    fn open_cell_editor(&mut self, position: Position, rows: &[Row]) -> Result<bool> {
        self.check_position(position)?;
        Ok(self.open_editor_at(position, rows))
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
    use crate::config::GridConfig;
    use crate::selection::SelectionState;
    use crate::types::Column;
    use crate::viewer::NoopHost;

    fn controller() -> ViewportController<NoopHost> {
        let mut controller = ViewportController::new(GridConfig::default(), NoopHost);
        controller.set_columns(
            (0..10)
                .map(|i| Column::new(format!("c{i}")).with_width(100.0))
                .collect(),
        );
        controller.set_row_count(100);
        controller.resize(300.0, 385.0);
        controller
    }

    #[test]
    fn test_scroll_to_column_and_row() {
        let mut controller = controller();
        controller.scroll_to_column(6).unwrap();
        assert_eq!(controller.viewport().scroll_left, 400.0);
        controller.scroll_to_row(50).unwrap();
        assert_eq!(controller.viewport().scroll_top, 50.0 * 35.0 + 35.0 - 350.0);
        assert!(controller.scroll_to_column(10).is_err());
        assert!(controller.scroll_to_row(100).is_err());
    }

    #[test]
    fn test_select_cell_out_of_bounds() {
        let mut controller = controller();
        let err = controller.select_cell(Position::new(10, 0)).unwrap_err();
        assert!(matches!(err, GridError::PositionOutOfBounds { idx: 10, .. }));
        controller.select_cell(Position::new(9, 99)).unwrap();
        assert_eq!(
            controller.selection_state(),
            SelectionState::CellActive(Position::new(9, 99))
        );
        // Scrolled into view
        assert_eq!(controller.viewport().scroll_left, 700.0);
    }
}

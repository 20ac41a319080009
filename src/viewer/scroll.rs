//! Scroll-related logic for `ViewportController`.
//!
//! Includes scroll event handling, clamping after layout changes, and
//! scrolling a cell into view at the nearest edge.

use log::trace;

use super::{GridHost, ViewportController};
use crate::layout::ScrollBounds;
use crate::types::Position;

impl<H: GridHost> ViewportController<H> {
    /// Largest valid scroll offsets for the current layout.
    pub fn scroll_bounds(&mut self) -> ScrollBounds {
        let total_width = self.metrics().total_width;
        let total_height = self.row_heights().total_height(self.row_count);
        ScrollBounds::new(
            total_width,
            total_height,
            self.viewport.width,
            self.body_height(),
        )
    }

    /// Scroll event from the body container. The header follows the body's
    /// horizontal offset. Returns true if the position changed.
    pub fn handle_scroll(&mut self, scroll_left: f32, scroll_top: f32) -> bool {
        let bounds = self.scroll_bounds();
        let moved = self.viewport.set_scroll(scroll_left, scroll_top, bounds);
        if moved {
            self.emit_scroll();
        }
        moved
    }

    /// Scroll by a delta (wheel). Returns true if the position changed.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let bounds = self.scroll_bounds();
        let moved = self.viewport.scroll_by(delta_x, delta_y, bounds);
        if moved {
            self.emit_scroll();
        }
        moved
    }

    /// Bring a cell into view, moving only as far as its nearest edge.
    /// Header cells only scroll horizontally; frozen columns never do.
    pub fn scroll_into_view(&mut self, position: Position) -> bool {
        let metrics = self.metrics();
        let Some(column) = metrics.get(position.idx) else {
            return false;
        };
        let scroll_left = self.viewport.scroll_left_for_column(
            column.left,
            column.width,
            column.is_frozen(),
            metrics.total_frozen_width,
        );
        let scroll_top = match position.data_row() {
            Some(row) => {
                let heights = self.row_heights();
                self.viewport.scroll_top_for_row(
                    heights.row_top(row),
                    heights.row_height(row),
                    self.body_height(),
                )
            }
            None => self.viewport.scroll_top,
        };
        self.handle_scroll(scroll_left, scroll_top)
    }

    /// Re-clamp the scroll position after content or container size changed.
    pub(crate) fn clamp_scroll(&mut self) {
        let bounds = self.scroll_bounds();
        if self.viewport.clamp_scroll(bounds) {
            trace!(
                "scroll clamped to ({}, {})",
                self.viewport.scroll_left,
                self.viewport.scroll_top
            );
            self.emit_scroll();
        }
    }

    fn emit_scroll(&mut self) {
        let scroll = self.viewport.scroll_position();
        self.host.on_scroll(scroll);
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
    use crate::config::GridConfig;
    use crate::types::{Column, Position};
    use crate::viewer::{NoopHost, RenderPlan, ViewportController};

    fn controller() -> ViewportController<NoopHost> {
        let mut controller = ViewportController::new(GridConfig::default(), NoopHost);
        let mut columns: Vec<Column> = (0..10)
            .map(|i| Column::new(format!("c{i}")).with_width(100.0))
            .collect();
        columns[0] = columns[0].clone().frozen();
        controller.set_columns(columns);
        controller.set_row_count(1000);
        controller.resize(400.0, 385.0);
        controller
    }

    #[test]
    fn test_scroll_clamped_and_header_synced() {
        let mut controller = controller();
        assert!(controller.handle_scroll(10_000.0, 10_000.0));
        let RenderPlan::Rows(snapshot) = controller.render_plan() else {
            panic!("expected rows");
        };
        // 1000px content in a 400px window, 35000px rows in a 350px body
        assert_eq!(snapshot.scroll.scroll_left, 600.0);
        assert_eq!(snapshot.scroll.scroll_top, 34_650.0);
        assert_eq!(snapshot.header_scroll_left, snapshot.scroll.scroll_left);
        assert!(!controller.handle_scroll(10_000.0, 10_000.0));
    }

    #[test]
    fn test_scroll_into_view_nearest_edge() {
        let mut controller = controller();
        assert!(controller.scroll_into_view(Position::new(5, 20)));
        // Column 5 spans [500, 600): trailing edge aligned to 400px window
        assert_eq!(controller.viewport().scroll_left, 200.0);
        // Row 20 spans [700, 735): bottom aligned to a 350px body
        assert_eq!(controller.viewport().scroll_top, 385.0);

        // Already visible: no movement
        assert!(!controller.scroll_into_view(Position::new(4, 15)));
        // Frozen column never scrolls
        assert!(!controller.scroll_into_view(Position::new(0, 15)));
    }

    #[test]
    fn test_shrinking_content_clamps_scroll() {
        let mut controller = controller();
        controller.handle_scroll(0.0, 30_000.0);
        controller.set_row_count(20);
        // 700px of rows in a 350px body
        assert_eq!(controller.viewport().scroll_top, 350.0);
    }
}

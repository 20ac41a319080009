//! Viewport state: container size and scroll position.

use serde::{Deserialize, Serialize};

/// Scroll offsets of the body container, in content pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    pub scroll_left: f32,
    pub scroll_top: f32,
}

/// Largest valid scroll offsets for the current content and container size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollBounds {
    pub max_left: f32,
    pub max_top: f32,
}

impl ScrollBounds {
    /// Bounds for content of the given size shown in a window of the given
    /// size. Content smaller than the window cannot scroll.
    pub fn new(
        content_width: f32,
        content_height: f32,
        window_width: f32,
        window_height: f32,
    ) -> Self {
        Self {
            max_left: (content_width - window_width).max(0.0),
            max_top: (content_height - window_height).max(0.0),
        }
    }
}

/// Viewport state - the visible window into the grid content
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position; frozen columns ignore it
    pub scroll_left: f32,
    /// Vertical scroll position of the body rows
    pub scroll_top: f32,
    /// Container width in pixels (0 until measured)
    pub width: f32,
    /// Container height in pixels (0 until measured)
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create an unmeasured viewport scrolled to the origin
    pub fn new() -> Self {
        Self {
            scroll_left: 0.0,
            scroll_top: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }

    pub fn scroll_position(&self) -> ScrollPosition {
        ScrollPosition {
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
        }
    }

    /// Resize the container
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Clamp scroll position to valid range. Returns true if it moved.
    pub fn clamp_scroll(&mut self, bounds: ScrollBounds) -> bool {
        let left = clamp_offset(self.scroll_left, bounds.max_left);
        let top = clamp_offset(self.scroll_top, bounds.max_top);
        self.apply(left, top)
    }

    /// Set absolute scroll position. Returns true if it moved.
    pub fn set_scroll(&mut self, scroll_left: f32, scroll_top: f32, bounds: ScrollBounds) -> bool {
        let left = clamp_offset(scroll_left, bounds.max_left);
        let top = clamp_offset(scroll_top, bounds.max_top);
        self.apply(left, top)
    }

    /// Scroll by delta amounts. Returns true if it moved.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, bounds: ScrollBounds) -> bool {
        self.set_scroll(self.scroll_left + delta_x, self.scroll_top + delta_y, bounds)
    }

    /// Horizontal offset that brings a column span into view, moving only as
    /// far as the nearest edge it crosses.
    ///
    /// The scrollable window starts after the frozen columns; frozen columns
    /// are always visible and never move the scroll position.
    pub fn scroll_left_for_column(
        &self,
        left: f32,
        width: f32,
        frozen: bool,
        frozen_width: f32,
    ) -> f32 {
        if frozen {
            return self.scroll_left;
        }
        let window_start = self.scroll_left + frozen_width;
        let window_end = self.scroll_left + self.width;
        if left < window_start {
            left - frozen_width
        } else if left + width > window_end {
            // Never scroll past the leading edge while revealing the trailing one
            (left + width - self.width).min(left - frozen_width)
        } else {
            self.scroll_left
        }
    }

    /// Vertical offset that brings a row span into view within a body window
    /// of `body_height` pixels, moving only as far as the nearest edge.
    pub fn scroll_top_for_row(&self, top: f32, height: f32, body_height: f32) -> f32 {
        if top < self.scroll_top {
            top
        } else if top + height > self.scroll_top + body_height {
            (top + height - body_height).min(top)
        } else {
            self.scroll_top
        }
    }

    fn apply(&mut self, scroll_left: f32, scroll_top: f32) -> bool {
        let moved = (scroll_left - self.scroll_left).abs() > f32::EPSILON
            || (scroll_top - self.scroll_top).abs() > f32::EPSILON;
        self.scroll_left = scroll_left;
        self.scroll_top = scroll_top;
        moved
    }
}

fn clamp_offset(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max.max(0.0))
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

    fn viewport(width: f32, height: f32) -> Viewport {
        let mut viewport = Viewport::new();
        viewport.resize(width, height);
        viewport
    }

    #[test]
    fn test_initial_scroll_zero_and_unmeasured() {
        let viewport = Viewport::new();
        assert_eq!(viewport.scroll_position(), ScrollPosition::default());
        assert!(!viewport.is_measured());
    }

    #[test]
    fn test_scroll_clamped() {
        let mut viewport = viewport(300.0, 200.0);
        let bounds = ScrollBounds::new(1000.0, 700.0, 300.0, 200.0);
        assert!(viewport.set_scroll(5000.0, -20.0, bounds));
        assert_eq!(viewport.scroll_left, 700.0);
        assert_eq!(viewport.scroll_top, 0.0);
        assert!(!viewport.scroll_by(10.0, 0.0, bounds));
    }

    #[test]
    fn test_small_content_cannot_scroll() {
        let mut viewport = viewport(300.0, 200.0);
        let bounds = ScrollBounds::new(100.0, 50.0, 300.0, 200.0);
        viewport.set_scroll(40.0, 40.0, bounds);
        assert_eq!(viewport.scroll_position(), ScrollPosition::default());
    }

    #[test]
    fn test_column_into_view_nearest_edge() {
        let mut viewport = viewport(300.0, 200.0);
        viewport.scroll_left = 200.0;
        // Window over scrollable content is [300, 500) with a 100px frozen column
        let reveal =
            |left: f32, frozen: bool| viewport.scroll_left_for_column(left, 100.0, frozen, 100.0);
        assert_eq!(reveal(350.0, false), 200.0);
        // Past the right edge: align trailing edge
        assert_eq!(reveal(500.0, false), 300.0);
        // Hidden behind the frozen column: align leading edge after it
        assert_eq!(reveal(150.0, false), 50.0);
        // Frozen columns never scroll
        assert_eq!(reveal(0.0, true), 200.0);
    }

    #[test]
    fn test_wide_column_aligns_leading_edge() {
        let viewport = viewport(300.0, 200.0);
        assert_eq!(
            viewport.scroll_left_for_column(400.0, 500.0, false, 0.0),
            400.0
        );
    }

    #[test]
    fn test_row_into_view_nearest_edge() {
        let mut viewport = viewport(300.0, 200.0);
        viewport.scroll_top = 100.0;
        assert_eq!(viewport.scroll_top_for_row(150.0, 35.0, 140.0), 100.0);
        assert_eq!(viewport.scroll_top_for_row(240.0, 35.0, 140.0), 135.0);
        assert_eq!(viewport.scroll_top_for_row(70.0, 35.0, 140.0), 70.0);
    }
}

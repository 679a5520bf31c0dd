//! Canvas bounds and the clamp applied to every position or size change.

use serde::{Deserialize, Serialize};

/// Smallest width or height a resize may produce.
pub const MIN_ELEMENT_SIZE: f64 = 1.0;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Dimensions of the canvas surface in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl CanvasSize {
    /// Create a canvas size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

/// Axis-aligned box of an element, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (pixels from left).
    pub x: f64,
    /// Y position (pixels from top).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a rect.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is within this rect (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Move the rect so that it lies within the canvas.
    #[must_use]
    pub fn clamped_to(self, canvas: CanvasSize) -> Self {
        let (x, y) = clamp(
            self.x,
            self.y,
            self.width,
            self.height,
            canvas.width,
            canvas.height,
        );
        Self { x, y, ..self }
    }

    /// Shrink the rect from its fixed top-left corner so it does not cross
    /// the right or bottom canvas edge.
    #[must_use]
    pub fn resized_within(self, canvas: CanvasSize) -> Self {
        let (width, height) = clamp_size(
            self.x,
            self.y,
            self.width,
            self.height,
            canvas.width,
            canvas.height,
        );
        Self {
            width,
            height,
            ..self
        }
    }
}

/// Bound a proposed top-left position so the box stays on the canvas.
///
/// Returns `(max(0, min(x, canvas_width - width)), max(0, min(y, canvas_height - height)))`.
/// When the element is larger than the canvas the upper bound is negative and
/// the result pins to `0`.
#[must_use]
pub fn clamp(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> (f64, f64) {
    (
        x.min(canvas_width - width).max(0.0),
        y.min(canvas_height - height).max(0.0),
    )
}

/// Bound a proposed size so the box, anchored at `(x, y)`, does not exceed
/// the canvas. Never returns less than [`MIN_ELEMENT_SIZE`].
#[must_use]
pub fn clamp_size(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> (f64, f64) {
    (
        width.min(canvas_width - x).max(MIN_ELEMENT_SIZE),
        height.min(canvas_height - y).max(MIN_ELEMENT_SIZE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_negative_drag_pins_to_origin() {
        assert_eq!(clamp(-50.0, -50.0, 100.0, 40.0, 500.0, 500.0), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_past_far_edge() {
        assert_eq!(
            clamp(700.0, 700.0, 100.0, 40.0, 500.0, 500.0),
            (400.0, 460.0)
        );
    }

    #[test]
    fn test_clamp_element_larger_than_canvas() {
        assert_eq!(clamp(30.0, 10.0, 600.0, 40.0, 500.0, 500.0), (0.0, 10.0));
    }

    #[test]
    fn test_clamp_size_keeps_origin() {
        let rect =
            Rect::new(450.0, 100.0, 200.0, 50.0).resized_within(CanvasSize::new(500.0, 500.0));
        assert_eq!(rect, Rect::new(450.0, 100.0, 50.0, 50.0));
    }

    #[test]
    fn test_clamp_size_floor() {
        assert_eq!(
            clamp_size(10.0, 10.0, -20.0, 0.0, 500.0, 500.0),
            (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE)
        );
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 30.0));
        assert!(!rect.contains(31.0, 15.0));
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_on_canvas(
            canvas_w in 1.0f64..2000.0,
            canvas_h in 1.0f64..2000.0,
            w_frac in 0.0f64..=1.0,
            h_frac in 0.0f64..=1.0,
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
        ) {
            let width = canvas_w * w_frac;
            let height = canvas_h * h_frac;
            let (cx, cy) = clamp(x, y, width, height, canvas_w, canvas_h);
            prop_assert!(cx >= 0.0 && cy >= 0.0);
            prop_assert!(cx + width <= canvas_w + 1e-9);
            prop_assert!(cy + height <= canvas_h + 1e-9);
        }

        #[test]
        fn prop_clamp_is_idempotent(
            canvas_w in 0.0f64..2000.0,
            canvas_h in 0.0f64..2000.0,
            width in 0.0f64..3000.0,
            height in 0.0f64..3000.0,
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
        ) {
            let once = clamp(x, y, width, height, canvas_w, canvas_h);
            let twice = clamp(once.0, once.1, width, height, canvas_w, canvas_h);
            prop_assert_eq!(once, twice);
        }
    }
}

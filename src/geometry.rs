// src/geometry.rs
//! Rectangles for the shared-element transition: where the thumbnail sits,
//! where the enlarged image should land, and how to write either onto an
//! element's inline style.

use web_sys::{Element, HtmlElement};

/// Smallest padding kept between the enlarged image and the viewport edge.
pub const MIN_PADDING: f64 = 16.0;
/// Largest padding kept between the enlarged image and the viewport edge.
pub const MAX_PADDING: f64 = 64.0;
/// Padding as a fraction of the viewport width, before clamping.
pub const PADDING_RATIO: f64 = 0.06;
/// Floor for the usable area in each dimension.
pub const MIN_USABLE: f64 = 64.0;
/// Side of the fallback square used when a source rect is degenerate.
pub const FALLBACK_SIDE: f64 = 2.0;

/// A viewport-relative rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reads `innerWidth`/`innerHeight` from the current window.
    pub fn current() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::new(0.0, 0.0);
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Self::new(width, height)
    }

    /// Padding around the enlarged image: 6% of the width, kept within 16..=64.
    pub fn padding(&self) -> f64 {
        (self.width * PADDING_RATIO).clamp(MIN_PADDING, MAX_PADDING)
    }
}

/// The element's current on-screen rectangle.
pub fn bounding_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
}

/// Returns `rect` unchanged when it has area, otherwise a 2x2 square centred
/// in the viewport.
pub fn safe_rect(rect: Rect, viewport: Viewport) -> Rect {
    if rect.is_visible() {
        return rect;
    }

    let half = FALLBACK_SIDE / 2.0;
    Rect::new(
        viewport.height / 2.0 - half,
        viewport.width / 2.0 - half,
        FALLBACK_SIDE,
        FALLBACK_SIDE,
    )
}

/// Fits an image of the given natural size inside the padded viewport,
/// preserving its aspect ratio, and centres it in the full viewport.
pub fn target_rect(natural_width: f64, natural_height: f64, viewport: Viewport) -> Rect {
    let padding = viewport.padding();
    let usable_width = (viewport.width - padding * 2.0).max(MIN_USABLE);
    let usable_height = (viewport.height - padding * 2.0).max(MIN_USABLE);

    let width = natural_width.max(1.0);
    let height = natural_height.max(1.0);
    let scale = (usable_width / width).min(usable_height / height);

    let target_width = width * scale;
    let target_height = height * scale;

    Rect::new(
        (viewport.height - target_height) / 2.0,
        (viewport.width - target_width) / 2.0,
        target_width,
        target_height,
    )
}

/// First strictly positive value, or 0 when none is.
///
/// Image natural sizes read as 0 before decode and after a failed load, so the
/// controller walks a chain of candidates (stage image, thumbnail, measured rect).
pub fn first_positive(candidates: &[f64]) -> f64 {
    candidates
        .iter()
        .copied()
        .find(|value| *value > 0.0)
        .unwrap_or(0.0)
}

/// Writes `rect` as absolute `top/left/width/height` on the element's style.
pub fn apply_rect(element: &HtmlElement, rect: Rect) {
    let style = element.style();
    let _ = style.set_property("top", &format!("{}px", rect.top));
    let _ = style.set_property("left", &format!("{}px", rect.left));
    let _ = style.set_property("width", &format!("{}px", rect.width));
    let _ = style.set_property("height", &format!("{}px", rect.height));
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_contained(rect: Rect, viewport: Viewport) {
        assert!(rect.top >= -EPSILON, "top {} out of viewport", rect.top);
        assert!(rect.left >= -EPSILON, "left {} out of viewport", rect.left);
        assert!(rect.right() <= viewport.width + EPSILON);
        assert!(rect.bottom() <= viewport.height + EPSILON);
    }

    #[test]
    fn test_padding_is_clamped() {
        assert_eq!(Viewport::new(100.0, 800.0).padding(), MIN_PADDING);
        assert!((Viewport::new(500.0, 800.0).padding() - 30.0).abs() < EPSILON);
        assert_eq!(Viewport::new(4000.0, 800.0).padding(), MAX_PADDING);
    }

    #[test]
    fn test_safe_rect_keeps_visible_rect() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(safe_rect(rect, Viewport::new(800.0, 600.0)), rect);
    }

    #[test]
    fn test_safe_rect_centres_fallback() {
        let viewport = Viewport::new(800.0, 600.0);
        for degenerate in [
            Rect::new(0.0, 0.0, 0.0, 0.0),
            Rect::new(50.0, 50.0, 100.0, 0.0),
            Rect::new(50.0, 50.0, -3.0, 10.0),
        ] {
            let rect = safe_rect(degenerate, viewport);
            assert_eq!(rect, Rect::new(299.0, 399.0, 2.0, 2.0));
        }
    }

    #[test]
    fn test_target_rect_landscape() {
        let viewport = Viewport::new(1000.0, 800.0);
        // padding = 60, usable = 880 x 680
        let rect = target_rect(2000.0, 1000.0, viewport);
        assert!((rect.width - 880.0).abs() < EPSILON);
        assert!((rect.height - 440.0).abs() < EPSILON);
        assert!((rect.left - 60.0).abs() < EPSILON);
        assert!((rect.top - 180.0).abs() < EPSILON);
    }

    #[test]
    fn test_target_rect_portrait_upscales() {
        let viewport = Viewport::new(1000.0, 800.0);
        let rect = target_rect(10.0, 20.0, viewport);
        assert!((rect.height - 680.0).abs() < EPSILON);
        assert!((rect.width - 340.0).abs() < EPSILON);
        assert!((rect.left - 330.0).abs() < EPSILON);
    }

    #[test]
    fn test_target_rect_zero_natural_size() {
        let viewport = Viewport::new(1000.0, 800.0);
        let rect = target_rect(0.0, 0.0, viewport);
        assert!(rect.is_visible());
        assert!((rect.width - rect.height).abs() < EPSILON);
        assert_contained(rect, viewport);
    }

    #[test]
    fn test_target_rect_contained_and_aspect_preserved() {
        let viewports = [
            Viewport::new(96.0, 96.0),
            Viewport::new(320.0, 568.0),
            Viewport::new(1280.0, 720.0),
            Viewport::new(3840.0, 2160.0),
            Viewport::new(500.0, 3000.0),
        ];
        let sizes = [
            (1.0, 1.0),
            (3.0, 7000.0),
            (6000.0, 4.0),
            (640.0, 480.0),
            (1080.0, 1920.0),
            (12345.6, 789.1),
        ];

        for viewport in viewports {
            for (w, h) in sizes {
                let rect = target_rect(w, h, viewport);
                assert_contained(rect, viewport);

                let expected = w / h;
                let actual = rect.width / rect.height;
                assert!(
                    (actual - expected).abs() <= expected * 1e-9,
                    "aspect {} != {} for {}x{} in {:?}",
                    actual,
                    expected,
                    w,
                    h,
                    viewport
                );

                let padding = viewport.padding();
                assert!(rect.width <= viewport.width - 2.0 * padding + EPSILON);
                assert!(rect.height <= viewport.height - 2.0 * padding + EPSILON);
            }
        }
    }

    #[test]
    fn test_first_positive() {
        assert_eq!(first_positive(&[0.0, 0.0, 12.0, 5.0]), 12.0);
        assert_eq!(first_positive(&[3.0, 0.0]), 3.0);
        assert_eq!(first_positive(&[0.0, -1.0]), 0.0);
        assert_eq!(first_positive(&[]), 0.0);
    }
}

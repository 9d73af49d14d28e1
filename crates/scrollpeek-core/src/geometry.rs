#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Everything here is measured in screen pixels as `f64`. Hosts that work
//! in cells or device pixels convert before handing values over, and round
//! or clamp the results before painting.

/// Replace negative, NaN and infinite values with zero.
#[inline]
pub fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// An axis-aligned rectangle in screen space.
///
/// Origin is at the top-left of the screen, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ScreenRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Vertical scroll state of a scrollable region.
///
/// `content_extent >= viewport_extent` whenever scrolling is possible; when
/// both are equal nothing can scroll and consumers must not divide by the
/// (zero) scroll range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content.
    pub offset: f64,
    /// Total height of the scrollable content.
    pub content_extent: f64,
    /// Height of the visible part of the region.
    pub viewport_extent: f64,
}

impl ScrollMetrics {
    /// Create metrics, sanitizing every field with [`sanitize_extent`].
    #[must_use]
    pub fn new(offset: f64, content_extent: f64, viewport_extent: f64) -> Self {
        Self {
            offset: sanitize_extent(offset),
            content_extent: sanitize_extent(content_extent),
            viewport_extent: sanitize_extent(viewport_extent),
        }
    }

    /// Largest reachable offset, never negative.
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Whether the content is taller than the viewport.
    #[inline]
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.content_extent > self.viewport_extent
    }
}

#[cfg(test)]
mod tests {
    use super::{ScreenRect, ScrollMetrics, sanitize_extent};

    #[test]
    fn rect_edges() {
        let r = ScreenRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn rect_contains_boundary_conditions() {
        let r = ScreenRect::from_size(5.0, 5.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(4.9, 4.9));
        assert!(!r.contains(5.0, 0.0));
        assert!(!r.contains(0.0, 5.0));
    }

    #[test]
    fn rect_is_empty() {
        assert!(ScreenRect::default().is_empty());
        assert!(ScreenRect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(ScreenRect::new(0.0, 0.0, f64::NAN, 10.0).is_empty());
        assert!(!ScreenRect::from_size(1.0, 1.0).is_empty());
    }

    #[test]
    fn sanitize_rejects_garbage() {
        assert_eq!(sanitize_extent(-3.0), 0.0);
        assert_eq!(sanitize_extent(f64::NAN), 0.0);
        assert_eq!(sanitize_extent(f64::INFINITY), 0.0);
        assert_eq!(sanitize_extent(12.5), 12.5);
    }

    #[test]
    fn metrics_max_offset_never_negative() {
        let fits = ScrollMetrics::new(0.0, 100.0, 400.0);
        assert_eq!(fits.max_offset(), 0.0);
        assert!(!fits.is_scrollable());

        let tall = ScrollMetrics::new(50.0, 1000.0, 400.0);
        assert_eq!(tall.max_offset(), 600.0);
        assert!(tall.is_scrollable());
    }

    #[test]
    fn metrics_new_sanitizes() {
        let m = ScrollMetrics::new(-10.0, f64::NAN, 300.0);
        assert_eq!(m.offset, 0.0);
        assert_eq!(m.content_extent, 0.0);
        assert_eq!(m.viewport_extent, 300.0);
    }
}

#![forbid(unsafe_code)]

//! Scrollbar thumb estimation.
//!
//! Native scrollbars do not expose their thumb geometry, so the popup
//! approximates it from scroll metrics and places itself next to the
//! estimated thumb center, just outside the region's trailing edge. When
//! that would run off the screen (a region flush with the screen's right
//! edge, as page-level scrolling always is), it flips inside the edge.
//!
//! # Algorithm
//!
//! ```text
//! track      = max(viewport - 2 * button_zone, 1)
//! ratio      = clamp(offset / max(content - viewport, 1), 0, 1)
//! thumb      = max(viewport / max(content, 1) * track, min_thumb)
//! travel     = max(track - thumb, 1)
//! thumb_top  = button_zone + ratio * travel
//! center     = thumb_top + thumb / 2
//! left       = viewport_right + horizontal_offset
//!              (or viewport_right - horizontal_offset - indicator_width
//!               when the popup would cross the screen's right edge),
//!              clamped to [0, screen_width - indicator_width]
//! top        = clamp(viewport_top + center - indicator / 2,
//!                    min_margin, screen - indicator - min_margin)
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | content fits the viewport | ratio is 0, thumb sits at the top |
//! | viewport shorter than both buttons | track floors to 1 |
//! | screen shorter than indicator + margins | top pinned to `min_margin` |
//! | no room right of the region | popup flips inside the trailing edge |
//! | screen narrower than the indicator | left pinned to `0` |
//! | negative or non-finite inputs | treated as 0 |

use crate::geometry::{ScreenRect, ScrollMetrics, sanitize_extent};

/// Fixed geometry of the scrollbar and the popup itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbGeometry {
    /// Height of each scrollbar arrow button at the track ends.
    pub button_zone: f64,
    /// Smallest thumb a platform renders.
    pub min_thumb_size: f64,
    /// Height of the popup, used for centering and clamping.
    pub indicator_height: f64,
    /// Width of the popup, used to keep it on screen horizontally.
    pub indicator_width: f64,
    /// Gap between the region's right edge and the popup.
    pub horizontal_offset: f64,
    /// Minimum distance kept from the screen's top and bottom.
    pub min_margin: f64,
}

impl Default for ThumbGeometry {
    fn default() -> Self {
        Self {
            button_zone: 16.0,
            min_thumb_size: 20.0,
            indicator_height: 28.0,
            indicator_width: 96.0,
            horizontal_offset: 8.0,
            min_margin: 4.0,
        }
    }
}

impl ThumbGeometry {
    fn sanitized(&self) -> Self {
        Self {
            button_zone: sanitize_extent(self.button_zone),
            min_thumb_size: sanitize_extent(self.min_thumb_size),
            indicator_height: sanitize_extent(self.indicator_height),
            indicator_width: sanitize_extent(self.indicator_width),
            horizontal_offset: if self.horizontal_offset.is_finite() {
                self.horizontal_offset
            } else {
                0.0
            },
            min_margin: sanitize_extent(self.min_margin),
        }
    }
}

/// Intermediate values of one estimate, relative to the region's top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbEstimate {
    /// Usable track length between the buttons.
    pub track: f64,
    /// Fraction scrolled, in `[0, 1]`.
    pub ratio: f64,
    /// Estimated thumb length.
    pub thumb_size: f64,
    /// Estimated thumb top edge.
    pub thumb_top: f64,
    /// Estimated thumb center.
    pub thumb_center: f64,
}

/// Where the popup should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorPosition {
    /// Screen-space top edge.
    pub top: f64,
    /// Screen-space left edge.
    pub left: f64,
}

/// Estimate the native thumb for the given metrics.
#[must_use]
pub fn estimate_thumb(metrics: &ScrollMetrics, geometry: &ThumbGeometry) -> ThumbEstimate {
    let metrics = ScrollMetrics::new(
        metrics.offset,
        metrics.content_extent,
        metrics.viewport_extent,
    );
    let geometry = geometry.sanitized();

    let track = (metrics.viewport_extent - 2.0 * geometry.button_zone).max(1.0);
    let range = (metrics.content_extent - metrics.viewport_extent).max(1.0);
    let ratio = (metrics.offset / range).clamp(0.0, 1.0);
    let thumb_size =
        (metrics.viewport_extent / metrics.content_extent.max(1.0) * track).max(geometry.min_thumb_size);
    let travel = (track - thumb_size).max(1.0);
    let thumb_top = geometry.button_zone + ratio * travel;

    ThumbEstimate {
        track,
        ratio,
        thumb_size,
        thumb_top,
        thumb_center: thumb_top + thumb_size / 2.0,
    }
}

/// Estimate the popup position beside the scrollbar thumb.
///
/// `viewport` is the scroll region's screen-space bounds; `screen` is the
/// whole screen, which both coordinates are clamped to.
#[must_use]
pub fn estimate(
    metrics: &ScrollMetrics,
    geometry: &ThumbGeometry,
    viewport: &ScreenRect,
    screen: &ScreenRect,
) -> IndicatorPosition {
    let thumb = estimate_thumb(metrics, geometry);
    let geometry = geometry.sanitized();
    let viewport_top = finite_or_zero(viewport.top());
    let viewport_right = finite_or_zero(viewport.right());

    let raw_top = viewport_top + thumb.thumb_center - geometry.indicator_height / 2.0;
    let lower = geometry.min_margin;
    let upper = sanitize_extent(screen.height) - geometry.indicator_height - geometry.min_margin;
    let top = if upper < lower {
        lower
    } else {
        raw_top.clamp(lower, upper)
    };
    if top != raw_top {
        crate::trace!(raw_top, top, "popup top clamped to screen");
    }

    IndicatorPosition {
        top,
        left: horizontal_position(viewport_right, &geometry, sanitize_extent(screen.width)),
    }
}

fn horizontal_position(viewport_right: f64, geometry: &ThumbGeometry, screen_width: f64) -> f64 {
    let max_left = (screen_width - geometry.indicator_width).max(0.0);
    let outside = viewport_right + geometry.horizontal_offset;
    let left = if outside > max_left {
        let inside = viewport_right - geometry.horizontal_offset - geometry.indicator_width;
        crate::trace!(outside, inside, "popup flipped inside trailing edge");
        inside
    } else {
        outside
    };
    left.clamp(0.0, max_left)
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: f64 = 900.0;

    fn screen(height: f64) -> ScreenRect {
        ScreenRect::from_size(1280.0, height)
    }

    fn viewport() -> ScreenRect {
        ScreenRect::new(100.0, 50.0, 600.0, 800.0)
    }

    fn place(offset: f64, content: f64) -> IndicatorPosition {
        estimate(
            &ScrollMetrics::new(offset, content, 800.0),
            &ThumbGeometry::default(),
            &viewport(),
            &screen(SCREEN),
        )
    }

    #[test]
    fn thumb_at_top_when_unscrolled() {
        let est = estimate_thumb(
            &ScrollMetrics::new(0.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
        );
        assert_eq!(est.track, 768.0);
        assert_eq!(est.ratio, 0.0);
        assert!((est.thumb_size - 76.8).abs() < 1e-9);
        assert_eq!(est.thumb_top, 16.0);
        assert!((est.thumb_center - 54.4).abs() < 1e-9);
    }

    #[test]
    fn thumb_at_bottom_when_fully_scrolled() {
        let est = estimate_thumb(
            &ScrollMetrics::new(7200.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
        );
        assert_eq!(est.ratio, 1.0);
        assert!((est.thumb_top + est.thumb_size - (16.0 + est.track)).abs() < 1e-9);
    }

    #[test]
    fn min_thumb_size_applies_for_huge_content() {
        let est = estimate_thumb(
            &ScrollMetrics::new(0.0, 10_000_000.0, 800.0),
            &ThumbGeometry::default(),
        );
        assert_eq!(est.thumb_size, 20.0);
    }

    #[test]
    fn content_that_fits_is_ratio_zero() {
        let est = estimate_thumb(&ScrollMetrics::new(0.0, 800.0, 800.0), &ThumbGeometry::default());
        assert_eq!(est.ratio, 0.0);
        assert!(est.thumb_center.is_finite());
    }

    #[test]
    fn zero_extents_are_finite() {
        let est = estimate_thumb(&ScrollMetrics::new(0.0, 0.0, 0.0), &ThumbGeometry::default());
        assert_eq!(est.track, 1.0);
        assert!(est.thumb_top.is_finite());
        let pos = estimate(
            &ScrollMetrics::default(),
            &ThumbGeometry::default(),
            &ScreenRect::default(),
            &ScreenRect::default(),
        );
        assert!(pos.top.is_finite() && pos.left.is_finite());
    }

    #[test]
    fn left_sits_outside_trailing_edge() {
        assert_eq!(place(0.0, 8000.0).left, 708.0);
    }

    #[test]
    fn left_flips_inside_a_screen_wide_region() {
        let pos = estimate(
            &ScrollMetrics::new(0.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
            &ScreenRect::from_size(1280.0, 800.0),
            &ScreenRect::from_size(1280.0, 800.0),
        );
        // 1280 - 8 - 96
        assert_eq!(pos.left, 1176.0);
    }

    #[test]
    fn left_flips_when_only_part_of_the_popup_fits() {
        let pos = estimate(
            &ScrollMetrics::new(0.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
            &ScreenRect::new(100.0, 0.0, 1100.0, 800.0),
            &screen(800.0),
        );
        // 1200 + 8 + 96 overruns 1280.
        assert_eq!(pos.left, 1096.0);
    }

    #[test]
    fn left_pinned_to_zero_on_narrow_screen() {
        let pos = estimate(
            &ScrollMetrics::new(0.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
            &ScreenRect::from_size(60.0, 800.0),
            &ScreenRect::from_size(60.0, 800.0),
        );
        assert_eq!(pos.left, 0.0);
    }

    #[test]
    fn top_centers_on_thumb() {
        // viewport_top 50 + center 54.4 - 14
        assert!((place(0.0, 8000.0).top - 90.4).abs() < 1e-9);
    }

    #[test]
    fn top_clamped_to_screen() {
        let geometry = ThumbGeometry {
            button_zone: 0.0,
            ..ThumbGeometry::default()
        };
        let high = estimate(
            &ScrollMetrics::new(0.0, 8000.0, 800.0),
            &geometry,
            &ScreenRect::new(0.0, -500.0, 10.0, 800.0),
            &screen(SCREEN),
        );
        assert_eq!(high.top, 4.0);

        let low = estimate(
            &ScrollMetrics::new(7200.0, 8000.0, 800.0),
            &geometry,
            &ScreenRect::new(0.0, 400.0, 10.0, 800.0),
            &screen(SCREEN),
        );
        assert_eq!(low.top, SCREEN - 28.0 - 4.0);
    }

    #[test]
    fn tiny_screen_pins_to_margin() {
        let pos = estimate(
            &ScrollMetrics::new(100.0, 8000.0, 800.0),
            &ThumbGeometry::default(),
            &viewport(),
            &screen(20.0),
        );
        assert_eq!(pos.top, 4.0);
    }

    #[test]
    fn top_moves_down_as_offset_grows() {
        let mut last = f64::MIN;
        for step in 0..=72 {
            let top = place(f64::from(step) * 100.0, 8000.0).top;
            assert!(top >= last, "step {step}: {top} < {last}");
            last = top;
        }
    }

    #[test]
    fn offset_past_end_is_clamped() {
        assert_eq!(place(9000.0, 8000.0), place(7200.0, 8000.0));
    }
}

//! Property-based invariant tests for thumb estimation.
//!
//! 1. `top` is non-decreasing in scroll offset for fixed extents.
//! 2. `top` stays inside `[min_margin, screen - indicator - min_margin]`.
//! 3. Output is always finite, even for degenerate metrics.
//! 4. The thumb never leaves the track.
//! 5. The popup never crosses the screen's left or right edge.

use proptest::prelude::*;
use scrollpeek_core::geometry::{ScreenRect, ScrollMetrics};
use scrollpeek_core::thumb::{ThumbGeometry, estimate, estimate_thumb};

fn geometry_strategy() -> impl Strategy<Value = ThumbGeometry> {
    (
        0.0f64..24.0,
        8.0f64..48.0,
        16.0f64..40.0,
        40.0f64..160.0,
        0.0f64..16.0,
        0.0f64..12.0,
    )
        .prop_map(
            |(button_zone, min_thumb_size, indicator_height, indicator_width, horizontal_offset, min_margin)| {
                ThumbGeometry {
                    button_zone,
                    min_thumb_size,
                    indicator_height,
                    indicator_width,
                    horizontal_offset,
                    min_margin,
                }
            },
        )
}

/// (viewport_extent, content_extent) with content >= viewport.
fn extents_strategy() -> impl Strategy<Value = (f64, f64)> {
    (50.0f64..2_000.0, 0.0f64..5_000_000.0).prop_map(|(viewport, extra)| (viewport, viewport + extra))
}

fn viewport_strategy() -> impl Strategy<Value = ScreenRect> {
    (0.0f64..400.0, 0.0f64..300.0, 100.0f64..1_500.0)
        .prop_map(|(x, y, w)| ScreenRect::new(x, y, w, 0.0))
}

proptest! {
    #[test]
    fn top_is_monotone_in_offset(
        geometry in geometry_strategy(),
        (viewport_extent, content) in extents_strategy(),
        bounds in viewport_strategy(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        screen in 200.0f64..3_000.0,
    ) {
        let range = content - viewport_extent;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let bounds = ScreenRect::new(bounds.x, bounds.y, bounds.width, viewport_extent);
        let first = estimate(&ScrollMetrics::new(lo * range, content, viewport_extent), &geometry, &bounds, &ScreenRect::from_size(2_000.0, screen));
        let second = estimate(&ScrollMetrics::new(hi * range, content, viewport_extent), &geometry, &bounds, &ScreenRect::from_size(2_000.0, screen));
        prop_assert!(first.top <= second.top, "{} > {}", first.top, second.top);
        prop_assert_eq!(first.left, second.left);
    }
}

proptest! {
    #[test]
    fn top_is_bounded_by_screen(
        geometry in geometry_strategy(),
        (viewport_extent, content) in extents_strategy(),
        bounds in viewport_strategy(),
        fraction in 0.0f64..=1.0,
        screen in 200.0f64..3_000.0,
    ) {
        let offset = fraction * content;
        let bounds = ScreenRect::new(bounds.x, bounds.y, bounds.width, viewport_extent);
        let pos = estimate(&ScrollMetrics::new(offset, content, viewport_extent), &geometry, &bounds, &ScreenRect::from_size(2_000.0, screen));
        let lower = geometry.min_margin;
        let upper = screen - geometry.indicator_height - geometry.min_margin;
        prop_assert!(pos.top >= lower - 1e-9, "top {} below {}", pos.top, lower);
        prop_assert!(pos.top <= upper + 1e-9, "top {} above {}", pos.top, upper);
    }
}

proptest! {
    #[test]
    fn output_is_always_finite(
        offset in prop::num::f64::ANY,
        content in prop::num::f64::ANY,
        viewport_extent in prop::num::f64::ANY,
        screen in prop::num::f64::ANY,
    ) {
        let metrics = ScrollMetrics { offset, content_extent: content, viewport_extent };
        let thumb = estimate_thumb(&metrics, &ThumbGeometry::default());
        prop_assert!(thumb.ratio.is_finite());
        prop_assert!(thumb.thumb_center.is_finite());
        let pos = estimate(&metrics, &ThumbGeometry::default(), &ScreenRect::from_size(800.0, 600.0), &ScreenRect::from_size(screen, screen));
        prop_assert!(pos.top.is_finite());
        prop_assert!(pos.left.is_finite());
    }
}

proptest! {
    #[test]
    fn thumb_stays_on_track_when_it_fits(
        (viewport_extent, content) in extents_strategy(),
        fraction in 0.0f64..=1.0,
    ) {
        let geometry = ThumbGeometry::default();
        let thumb = estimate_thumb(&ScrollMetrics::new(fraction * content, content, viewport_extent), &geometry);
        prop_assume!(thumb.track - thumb.thumb_size >= 1.0);
        prop_assert!(thumb.thumb_top >= geometry.button_zone - 1e-9);
        prop_assert!(thumb.thumb_top + thumb.thumb_size <= geometry.button_zone + thumb.track + 1e-6);
    }
}

proptest! {
    #[test]
    fn left_stays_on_screen(
        geometry in geometry_strategy(),
        (viewport_extent, content) in extents_strategy(),
        bounds in viewport_strategy(),
        screen_width in 200.0f64..2_400.0,
    ) {
        // Regions never extend past the screen.
        let width = bounds.width.min(screen_width - bounds.x.min(screen_width));
        let bounds = ScreenRect::new(bounds.x.min(screen_width), bounds.y, width, viewport_extent);
        let screen = ScreenRect::from_size(screen_width, 1_000.0);
        let pos = estimate(&ScrollMetrics::new(0.0, content, viewport_extent), &geometry, &bounds, &screen);
        prop_assert!(pos.left >= 0.0, "left {} below 0", pos.left);
        if geometry.indicator_width <= screen_width {
            prop_assert!(
                pos.left + geometry.indicator_width <= screen_width + 1e-9,
                "left {} + {} past {}", pos.left, geometry.indicator_width, screen_width
            );
        }
    }
}

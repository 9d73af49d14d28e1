#![forbid(unsafe_code)]

//! Core: geometry, date labels, visible-row location, thumb estimation and
//! recompute throttling.
//!
//! Everything in this crate is a pure function or plain data. The stateful
//! popup lifecycle that drives these helpers lives in `scrollpeek-runtime`.

pub mod date_label;
pub mod geometry;
pub mod locator;
pub mod logging;
pub mod throttle;
pub mod thumb;

pub use date_label::{IsoMonthLabel, LabelFormatter, parse_label};
pub use geometry::{ScreenRect, ScrollMetrics};
pub use locator::{RowGeometrySnapshot, locate, locate_row};
pub use throttle::should_recompute;
pub use thumb::{IndicatorPosition, ThumbEstimate, ThumbGeometry, estimate, estimate_thumb};

// Re-export the tracing macro at crate root so `crate::trace!` resolves
// the same way with and without the feature.
#[cfg(feature = "tracing")]
pub use logging::trace;

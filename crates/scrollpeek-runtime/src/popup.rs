#![forbid(unsafe_code)]

//! Scroll popup lifecycle.
//!
//! [`ScrollPopup`] shows a small label beside the native scrollbar thumb
//! while the user scrolls a sorted list, and hides it once scrolling has
//! been quiet for a while.
//!
//! # Lifecycle
//!
//! ```text
//!            on_scroll                 on_scroll (debounce)
//!   Hidden ─────────────▶ Visible ◀──────────────┐
//!     ▲                      │ └─────────────────┘
//!     └──────────────────────┘
//!       poll: quiet period elapsed since last scroll
//! ```
//!
//! - The first scroll of a burst shows the popup, positions it and computes
//!   the label without consulting the throttle.
//! - Later scrolls always reposition; the label is recomputed at most once
//!   per `label_interval`.
//! - Every scroll re-arms the single hide deadline.
//! - [`teardown`](ScrollPopup::teardown) is terminal.
//!
//! # Invariants
//!
//! 1. At most one hide is pending.
//! 2. The popup never hides before `quiet_period` has passed since the
//!    latest scroll.
//! 3. Hiding freezes `label`, `top` and `left`; only `visible` changes.
//! 4. After teardown the output never changes again.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Rows unavailable | Label resolves to `""` |
//! | Metrics or bounds unavailable | Position keeps its last value |
//! | Unparsable date | Label resolves to `""` |
//! | Scroll or poll after teardown | Ignored |

use std::time::{Duration, Instant};

use scrollpeek_core::date_label::{IsoMonthLabel, LabelFormatter};
use scrollpeek_core::geometry::ScreenRect;
use scrollpeek_core::locator::{RowGeometrySnapshot, locate_row};
use scrollpeek_core::throttle::should_recompute;
use scrollpeek_core::thumb::{IndicatorPosition, estimate};
use tracing::{debug, trace};

use crate::activity::ActivitySource;
use crate::config::{ConfigError, PopupConfig, duration_ms};
use crate::hide_timer::HideTimer;
use crate::observable::{Observable, Subscription};
use crate::provider::GeometryProvider;

/// What the rendering surface paints.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopupState {
    /// Whether the popup is shown.
    pub visible: bool,
    /// Coarse label for the first visible row, or `""`.
    pub label: String,
    /// Screen-space top edge.
    pub top: f64,
    /// Screen-space left edge.
    pub left: f64,
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No popup on screen.
    #[default]
    Hidden,
    /// Popup on screen, hide pending.
    Visible,
}

impl Phase {
    /// Stable name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Visible => "visible",
        }
    }
}

/// Counters for diagnostics and the storm harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopupStats {
    /// Scroll notifications processed.
    pub scroll_events: u64,
    /// Hidden → Visible transitions.
    pub shows: u64,
    /// Visible → Hidden transitions.
    pub hides: u64,
    /// Label computations performed.
    pub label_recomputes: u64,
    /// Label computations skipped by the throttle.
    pub throttled_labels: u64,
    /// Row cache rebuilds.
    pub cache_rebuilds: u64,
    /// Geometry queries that failed and were absorbed.
    pub geometry_failures: u64,
}

/// Scroll position popup over a [`GeometryProvider`].
pub struct ScrollPopup<P: GeometryProvider, F: LabelFormatter = IsoMonthLabel> {
    config: PopupConfig,
    provider: P,
    formatter: F,
    output: Observable<PopupState>,
    phase: Phase,
    rows: Vec<RowGeometrySnapshot<P::Handle>>,
    last_activity: Option<Instant>,
    last_recompute: Option<Instant>,
    hide_timer: HideTimer,
    source: Option<Box<dyn ActivitySource>>,
    torn_down: bool,
    stats: PopupStats,
}

impl<P: GeometryProvider, F: LabelFormatter> std::fmt::Debug for ScrollPopup<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollPopup")
            .field("phase", &self.phase)
            .field("state", &self.output.get())
            .field("cached_rows", &self.rows.len())
            .field("next_deadline", &self.hide_timer.deadline())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<P: GeometryProvider> ScrollPopup<P> {
    /// Create a popup using the `YYYY-MM-DD` → `Mon YYYY` label.
    pub fn new(provider: P, config: PopupConfig) -> Result<Self, ConfigError> {
        Self::with_formatter(provider, config, IsoMonthLabel)
    }
}

impl<P: GeometryProvider, F: LabelFormatter> ScrollPopup<P, F> {
    /// Create a popup with a custom label formatter.
    pub fn with_formatter(provider: P, config: PopupConfig, formatter: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            formatter,
            output: Observable::new(PopupState::default()),
            phase: Phase::Hidden,
            rows: Vec::new(),
            last_activity: None,
            last_recompute: None,
            hide_timer: HideTimer::new(),
            source: None,
            torn_down: false,
            stats: PopupStats::default(),
        })
    }

    /// Hand over the scroll listener registration.
    ///
    /// A previously attached source is detached first. Attaching after
    /// teardown detaches the new source immediately.
    pub fn attach_source(&mut self, source: impl ActivitySource + 'static) {
        let mut source: Box<dyn ActivitySource> = Box::new(source);
        if self.torn_down {
            source.detach();
            return;
        }
        if let Some(mut previous) = self.source.replace(source) {
            previous.detach();
        }
    }

    /// Handle one scroll notification at `now`.
    pub fn on_scroll(&mut self, now: Instant) {
        if self.torn_down {
            trace!(target: "scrollpeek.popup", "scroll after teardown ignored");
            return;
        }
        self.stats.scroll_events += 1;
        self.last_activity = Some(now);

        let mut next = self.output.get();
        match self.phase {
            Phase::Hidden => {
                self.phase = Phase::Visible;
                self.stats.shows += 1;
                if self.config.refresh_rows_on_show {
                    self.rows.clear();
                }
                next.visible = true;
                next.label = self.compute_label();
                self.last_recompute = Some(now);
                debug!(target: "scrollpeek.popup", label = %next.label, "popup shown");
            }
            Phase::Visible => {
                if should_recompute(now, self.last_recompute, self.config.label_interval()) {
                    next.label = self.compute_label();
                    self.last_recompute = Some(now);
                } else {
                    self.stats.throttled_labels += 1;
                    trace!(target: "scrollpeek.popup", "label recompute throttled");
                }
            }
        }
        if let Some(position) = self.compute_position() {
            next.top = position.top;
            next.left = position.left;
        }
        self.output.set(next);

        self.arm_hide(now);
    }

    /// Advance timers to `now`. Returns `true` if the popup was hidden.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        if self.hide_timer.take_expired(now).is_none() {
            return false;
        }
        if self.phase != Phase::Visible {
            return false;
        }

        let quiet = self.config.quiet_period();
        let Some(last) = self.last_activity else {
            return false;
        };
        let elapsed = now.checked_duration_since(last).unwrap_or(Duration::ZERO);
        if elapsed < quiet {
            // Activity raced the deadline; wait out the rest of the period.
            self.arm_hide(last);
            return false;
        }

        self.phase = Phase::Hidden;
        self.stats.hides += 1;
        self.output.update(|state| state.visible = false);
        debug!(
            target: "scrollpeek.popup",
            quiet_ms = duration_ms(elapsed),
            "popup hidden"
        );
        true
    }

    /// When the host should next call [`poll`](Self::poll).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hide_timer.deadline()
    }

    /// Set the label from date text without touching visibility.
    ///
    /// Unparsable or absent text yields `""`.
    pub fn set_initial_label(&mut self, text: Option<&str>) {
        if self.torn_down {
            return;
        }
        let label = text
            .and_then(|t| self.formatter.format_label(t))
            .unwrap_or_default();
        self.output.update(|state| state.label = label);
    }

    /// Set the label from the first row's date.
    pub fn set_initial_label_from_first_row(&mut self) {
        if self.torn_down {
            return;
        }
        self.ensure_rows();
        let text = self
            .rows
            .first()
            .and_then(RowGeometrySnapshot::date_text)
            .map(str::to_owned);
        self.set_initial_label(text.as_deref());
    }

    /// Drop the row cache; it is rebuilt on next use.
    pub fn invalidate_rows(&mut self) {
        self.rows.clear();
    }

    /// Cancel the pending hide, detach the activity source and release the
    /// row cache. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.hide_timer.cancel();
        if let Some(mut source) = self.source.take() {
            source.detach();
        }
        self.rows = Vec::new();
        debug!(target: "scrollpeek.popup", phase = self.phase.as_str(), "popup torn down");
    }

    /// Current output.
    pub fn state(&self) -> PopupState {
        self.output.get()
    }

    /// Read-only handle to the output.
    pub fn output(&self) -> Observable<PopupState> {
        self.output.clone()
    }

    /// Subscribe to output changes. Dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&PopupState) + 'static) -> Subscription {
        self.output.subscribe(callback)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether an activity source is attached.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Number of cached rows.
    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> PopupStats {
        self.stats
    }

    /// Active configuration.
    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    /// The geometry provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the geometry provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    fn arm_hide(&mut self, from: Instant) {
        match from.checked_add(self.config.quiet_period()) {
            Some(deadline) => {
                self.hide_timer.arm(deadline);
            }
            None => {
                // Deadline past the clock's range: the popup stays up.
                self.hide_timer.cancel();
            }
        }
    }

    fn ensure_rows(&mut self) {
        if !self.rows.is_empty() {
            return;
        }
        match self.provider.row_snapshots() {
            Ok(rows) => {
                self.stats.cache_rebuilds += 1;
                trace!(target: "scrollpeek.popup", rows = rows.len(), "row cache rebuilt");
                self.rows = rows;
            }
            Err(err) => {
                self.stats.geometry_failures += 1;
                debug!(target: "scrollpeek.popup", error = %err, "row snapshots unavailable");
            }
        }
    }

    fn compute_label(&mut self) -> String {
        self.stats.label_recomputes += 1;
        self.ensure_rows();
        if self.rows.is_empty() {
            return String::new();
        }
        let metrics = match self.provider.scroll_metrics() {
            Ok(metrics) => metrics,
            Err(err) => {
                self.stats.geometry_failures += 1;
                debug!(target: "scrollpeek.popup", error = %err, "scroll metrics unavailable");
                return String::new();
            }
        };
        let edge = metrics.offset + self.provider.reference_inset();
        locate_row(&self.rows, edge)
            .and_then(RowGeometrySnapshot::date_text)
            .and_then(|text| self.formatter.format_label(text))
            .unwrap_or_default()
    }

    fn compute_position(&mut self) -> Option<IndicatorPosition> {
        let geometry = self
            .provider
            .scroll_metrics()
            .and_then(|metrics| self.provider.viewport_bounds().map(|bounds| (metrics, bounds)));
        match geometry {
            Ok((metrics, bounds)) => {
                let screen =
                    ScreenRect::from_size(self.provider.screen_width(), self.provider.screen_height());
                Some(estimate(&metrics, &self.config.thumb_geometry(), &bounds, &screen))
            }
            Err(err) => {
                self.stats.geometry_failures += 1;
                debug!(target: "scrollpeek.popup", error = %err, "popup position unavailable");
                None
            }
        }
    }
}

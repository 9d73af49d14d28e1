#![forbid(unsafe_code)]

//! Popup configuration.
//!
//! Every field has a default tuned for a desktop list with native
//! scrollbars. Durations are stored in milliseconds so the struct
//! serializes to plain numbers.
//!
//! # Usage
//!
//! ```
//! use scrollpeek_runtime::config::PopupConfig;
//! use std::time::Duration;
//!
//! let config = PopupConfig::default()
//!     .with_quiet_period(Duration::from_millis(1000))
//!     .with_button_zone(0.0);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::time::Duration;

use scrollpeek_core::thumb::ThumbGeometry;

/// Configuration for a [`ScrollPopup`](crate::popup::ScrollPopup).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopupConfig {
    /// Scroll inactivity before the popup hides (ms).
    pub quiet_period_ms: u64,

    /// Minimum interval between label recomputes within a burst (ms).
    pub label_interval_ms: u64,

    /// Height of each scrollbar arrow button.
    pub button_zone: f64,

    /// Smallest thumb the platform renders.
    pub min_thumb_size: f64,

    /// Popup height used for centering on the thumb and clamping.
    pub indicator_height: f64,

    /// Popup width, used to keep the popup on screen horizontally.
    pub indicator_width: f64,

    /// Gap between the scroll region's right edge and the popup.
    pub horizontal_offset: f64,

    /// Distance kept from the top and bottom of the screen.
    pub min_margin: f64,

    /// Drop the row cache every time the popup goes from hidden to visible.
    ///
    /// When `false` the cache is only rebuilt while empty or after
    /// [`invalidate_rows`](crate::popup::ScrollPopup::invalidate_rows).
    pub refresh_rows_on_show: bool,
}

impl Default for PopupConfig {
    fn default() -> Self {
        let thumb = ThumbGeometry::default();
        Self {
            quiet_period_ms: 1100,
            label_interval_ms: 100,
            button_zone: thumb.button_zone,
            min_thumb_size: thumb.min_thumb_size,
            indicator_height: thumb.indicator_height,
            indicator_width: thumb.indicator_width,
            horizontal_offset: thumb.horizontal_offset,
            min_margin: thumb.min_margin,
            refresh_rows_on_show: true,
        }
    }
}

impl PopupConfig {
    /// Quiet period as a [`Duration`].
    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Label recompute interval as a [`Duration`].
    #[must_use]
    pub fn label_interval(&self) -> Duration {
        Duration::from_millis(self.label_interval_ms)
    }

    /// Geometry handed to the thumb estimator.
    #[must_use]
    pub fn thumb_geometry(&self) -> ThumbGeometry {
        ThumbGeometry {
            button_zone: self.button_zone,
            min_thumb_size: self.min_thumb_size,
            indicator_height: self.indicator_height,
            indicator_width: self.indicator_width,
            horizontal_offset: self.horizontal_offset,
            min_margin: self.min_margin,
        }
    }

    /// Set the quiet period.
    #[must_use]
    pub fn with_quiet_period(mut self, period: Duration) -> Self {
        self.quiet_period_ms = duration_ms(period);
        self
    }

    /// Set the minimum label recompute interval.
    #[must_use]
    pub fn with_label_interval(mut self, interval: Duration) -> Self {
        self.label_interval_ms = duration_ms(interval);
        self
    }

    /// Set the scrollbar button height.
    #[must_use]
    pub fn with_button_zone(mut self, height: f64) -> Self {
        self.button_zone = height;
        self
    }

    /// Set the minimum thumb size.
    #[must_use]
    pub fn with_min_thumb_size(mut self, size: f64) -> Self {
        self.min_thumb_size = size;
        self
    }

    /// Set the popup height.
    #[must_use]
    pub fn with_indicator_height(mut self, height: f64) -> Self {
        self.indicator_height = height;
        self
    }

    /// Set the popup width.
    #[must_use]
    pub fn with_indicator_width(mut self, width: f64) -> Self {
        self.indicator_width = width;
        self
    }

    /// Set the gap to the right of the scroll region.
    #[must_use]
    pub fn with_horizontal_offset(mut self, offset: f64) -> Self {
        self.horizontal_offset = offset;
        self
    }

    /// Set the screen margin.
    #[must_use]
    pub fn with_min_margin(mut self, margin: f64) -> Self {
        self.min_margin = margin;
        self
    }

    /// Enable or disable the cache refresh on every show.
    #[must_use]
    pub fn with_refresh_rows_on_show(mut self, enabled: bool) -> Self {
        self.refresh_rows_on_show = enabled;
        self
    }

    /// Check the configuration for values the popup cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet_period_ms == 0 {
            return Err(ConfigError::ZeroQuietPeriod);
        }
        let extents = [
            ("button_zone", self.button_zone),
            ("min_thumb_size", self.min_thumb_size),
            ("indicator_height", self.indicator_height),
            ("indicator_width", self.indicator_width),
            ("min_margin", self.min_margin),
        ];
        for (field, value) in extents {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidExtent { field, value });
            }
        }
        if !self.horizontal_offset.is_finite() {
            return Err(ConfigError::InvalidExtent {
                field: "horizontal_offset",
                value: self.horizontal_offset,
            });
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl PopupConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Errors from [`PopupConfig::validate`] and JSON loading.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A zero quiet period would hide the popup before it is ever seen.
    ZeroQuietPeriod,
    /// A geometry value is negative, NaN or infinite.
    InvalidExtent {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The configuration text could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroQuietPeriod => write!(f, "quiet period must be greater than zero"),
            Self::InvalidExtent { field, value } => {
                write!(f, "{field} must be a finite, non-negative number (got {value})")
            }
            Self::Parse(msg) => write!(f, "invalid popup config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

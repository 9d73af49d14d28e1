#![forbid(unsafe_code)]

//! Scroll storm generator and JSONL logging.
//!
//! Generates deterministic scroll sequences for end-to-end checks of the
//! popup lifecycle. The same seed and pattern always produce the same
//! offsets and delays, so a run's state checksum can be compared across
//! builds.
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"storm_start","run_id":"...","case":"burst","seed":42,"pattern":"burst","provider":"whole_viewport","rows":2000,"event_count":60}
//! {"event":"storm_scroll","idx":0,"offset":1200.0,"delay_ms":16,"elapsed_ms":16}
//! {"event":"storm_state","at_ms":16,"visible":true,"label":"Feb 2016","top":120.5,"left":1176.0}
//! {"event":"storm_complete","outcome":"pass","total_scrolls":60,"shows":1,"hides":1,"duration_ms":2076,"checksum":"..."}
//! ```

use std::fmt;

use scrollpeek_runtime::{ConfigError, PopupConfig, PopupState, PopupStats};
use serde_json::json;

use crate::records::SeededRng;

// ============================================================================
// Errors
// ============================================================================

/// Errors from harness setup.
#[derive(Debug)]
pub enum HarnessError {
    /// An environment variable held an unusable value.
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
    /// Popup configuration rejected.
    Config(ConfigError),
    /// Reading the configuration file failed.
    Io(std::io::Error),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { var, value } => write!(f, "invalid {var}: {value:?}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidEnv { .. } => None,
        }
    }
}

impl From<ConfigError> for HarnessError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Pattern type for scroll storm generation.
#[derive(Debug, Clone, PartialEq)]
pub enum StormPattern {
    /// Rapid evenly spaced scrolls around a random position.
    Burst {
        /// Number of scroll events.
        count: usize,
        /// Gap between scrolls (ms).
        interval_ms: u64,
    },
    /// Decelerating bursts separated by pauses longer than the quiet period.
    Fling {
        /// Number of bursts.
        bursts: usize,
        /// Scrolls per burst.
        per_burst: usize,
        /// Pause before each burst after the first (ms).
        pause_ms: u64,
    },
    /// Slow, even top-to-bottom scroll.
    Sweep {
        /// Number of steps.
        steps: usize,
        /// Gap between steps (ms).
        interval_ms: u64,
    },
    /// Explicit `(offset, delay_ms)` pairs.
    Custom {
        /// Scroll sequence.
        events: Vec<(f64, u64)>,
    },
}

impl StormPattern {
    /// Pattern name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Burst { .. } => "burst",
            Self::Fling { .. } => "fling",
            Self::Sweep { .. } => "sweep",
            Self::Custom { .. } => "custom",
        }
    }

    /// Number of scroll events this pattern generates.
    pub fn event_count(&self) -> usize {
        match self {
            Self::Burst { count, .. } => *count,
            Self::Fling {
                bursts, per_burst, ..
            } => bursts * per_burst,
            Self::Sweep { steps, .. } => *steps,
            Self::Custom { events } => events.len(),
        }
    }

    /// Parse `burst`, `fling`, `sweep` (default parameters) or
    /// `custom:OFFSET@DELAY,OFFSET@DELAY,...`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "burst" => Some(Self::default()),
            "fling" => Some(Self::Fling {
                bursts: 4,
                per_burst: 20,
                pause_ms: 1500,
            }),
            "sweep" => Some(Self::Sweep {
                steps: 40,
                interval_ms: 250,
            }),
            other => {
                let list = other.strip_prefix("custom:")?;
                let events = list
                    .split(',')
                    .filter(|item| !item.trim().is_empty())
                    .map(|item| {
                        let (offset, delay) = item.trim().split_once('@')?;
                        Some((offset.parse().ok()?, delay.parse().ok()?))
                    })
                    .collect::<Option<Vec<(f64, u64)>>>()?;
                Some(Self::Custom { events })
            }
        }
    }
}

impl Default for StormPattern {
    fn default() -> Self {
        Self::Burst {
            count: 60,
            interval_ms: 16,
        }
    }
}

/// Which geometry provider the simulated page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// The list scrolls with the page.
    #[default]
    WholeViewport,
    /// The list lives in a scoped scroll region.
    ScopedContainer,
}

impl ProviderKind {
    /// Name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::WholeViewport => "whole_viewport",
            Self::ScopedContainer => "scoped_container",
        }
    }

    /// Parse a provider name.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "whole_viewport" | "page" => Some(Self::WholeViewport),
            "scoped_container" | "scoped" => Some(Self::ScopedContainer),
            _ => None,
        }
    }
}

/// Configuration for a storm run.
#[derive(Debug, Clone)]
pub struct StormConfig {
    /// Random seed for records and offsets.
    pub seed: u64,
    /// Storm pattern.
    pub pattern: StormPattern,
    /// Number of mock rows.
    pub rows: usize,
    /// Provider under test.
    pub provider: ProviderKind,
    /// Popup tunables.
    pub popup: PopupConfig,
    /// Screen size (width, height).
    pub screen: (f64, f64),
    /// Sticky header height.
    pub header_height: f64,
    /// Row height.
    pub row_height: f64,
    /// Test case name for logging.
    pub case_name: String,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pattern: StormPattern::default(),
            rows: 2_000,
            provider: ProviderKind::default(),
            popup: PopupConfig::default(),
            screen: (1280.0, 800.0),
            header_height: 36.0,
            row_height: 24.0,
            case_name: "default".into(),
        }
    }
}

impl StormConfig {
    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the storm pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: StormPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the row count.
    #[must_use]
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set the provider.
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Set the popup configuration.
    #[must_use]
    pub fn with_popup(mut self, popup: PopupConfig) -> Self {
        self.popup = popup;
        self
    }

    /// Set the test case name.
    #[must_use]
    pub fn with_case_name(mut self, name: impl Into<String>) -> Self {
        self.case_name = name.into();
        self
    }

    /// Build from `SCROLLPEEK_*` variables read through `lookup`.
    ///
    /// `SCROLLPEEK_CONFIG` names a JSON file; `read_file` loads it.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        read_file: impl Fn(&str) -> std::io::Result<String>,
    ) -> Result<Self, HarnessError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SCROLLPEEK_SEED") {
            config.seed = value.trim().parse().map_err(|_| HarnessError::InvalidEnv {
                var: "SCROLLPEEK_SEED",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("SCROLLPEEK_PATTERN") {
            config.pattern = StormPattern::parse(&value).ok_or_else(|| HarnessError::InvalidEnv {
                var: "SCROLLPEEK_PATTERN",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("SCROLLPEEK_ROWS") {
            config.rows = value.trim().parse().map_err(|_| HarnessError::InvalidEnv {
                var: "SCROLLPEEK_ROWS",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("SCROLLPEEK_PROVIDER") {
            config.provider = ProviderKind::parse(&value).ok_or_else(|| HarnessError::InvalidEnv {
                var: "SCROLLPEEK_PROVIDER",
                value: value.clone(),
            })?;
        }
        if let Some(path) = lookup("SCROLLPEEK_CONFIG") {
            let text = read_file(&path)?;
            config.popup = PopupConfig::from_json(&text)?;
        }
        config.case_name = config.pattern.name().to_string();
        Ok(config)
    }

    /// Content height of the generated list.
    pub fn content_extent(&self) -> f64 {
        self.header_height + self.rows as f64 * self.row_height
    }
}

// ============================================================================
// Scroll Event
// ============================================================================

/// A single scroll in a storm sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollEvent {
    /// Target scroll offset.
    pub offset: f64,
    /// Delay before this scroll (ms).
    pub delay_ms: u64,
    /// Index in the sequence.
    pub index: usize,
}

impl ScrollEvent {
    /// Create a scroll event.
    pub fn new(offset: f64, delay_ms: u64, index: usize) -> Self {
        Self {
            offset,
            delay_ms,
            index,
        }
    }

    /// Convert to JSONL format.
    pub fn to_jsonl(&self, elapsed_ms: u64) -> String {
        json!({
            "event": "storm_scroll",
            "idx": self.index,
            "offset": self.offset,
            "delay_ms": self.delay_ms,
            "elapsed_ms": elapsed_ms,
        })
        .to_string()
    }
}

// ============================================================================
// Storm Generator
// ============================================================================

/// Scroll storm generator.
#[derive(Debug, Clone)]
pub struct ScrollStorm {
    config: StormConfig,
    events: Vec<ScrollEvent>,
    run_id: String,
}

impl ScrollStorm {
    /// Generate the storm for `config`.
    ///
    /// `max_offset` is the largest reachable scroll offset; generated
    /// offsets stay within `[0, max_offset]`.
    pub fn new(config: StormConfig, max_offset: f64) -> Self {
        let run_id = format!("{:016x}-{}", config.seed, config.pattern.name());
        let max_offset = if max_offset.is_finite() { max_offset.max(0.0) } else { 0.0 };
        let mut rng = SeededRng::new(config.seed);

        let events = match &config.pattern {
            StormPattern::Burst { count, interval_ms } => {
                generate_burst(&mut rng, *count, *interval_ms, max_offset, config.row_height)
            }
            StormPattern::Fling {
                bursts,
                per_burst,
                pause_ms,
            } => generate_fling(&mut rng, *bursts, *per_burst, *pause_ms, max_offset),
            StormPattern::Sweep { steps, interval_ms } => {
                generate_sweep(*steps, *interval_ms, max_offset)
            }
            StormPattern::Custom { events } => events
                .iter()
                .enumerate()
                .map(|(i, &(offset, delay))| ScrollEvent::new(offset, delay, i))
                .collect(),
        };

        Self {
            config,
            events,
            run_id,
        }
    }

    /// Run ID.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Generated events.
    pub fn events(&self) -> &[ScrollEvent] {
        &self.events
    }

    /// Configuration.
    pub fn config(&self) -> &StormConfig {
        &self.config
    }

    /// Deterministic checksum of the event sequence.
    pub fn sequence_checksum(&self) -> String {
        let mut hash = FNV_OFFSET_BASIS;
        for event in &self.events {
            fnv_hash_bytes(&mut hash, &(event.index as u64).to_le_bytes());
            fnv_hash_bytes(&mut hash, &event.offset.to_bits().to_le_bytes());
            fnv_hash_bytes(&mut hash, &event.delay_ms.to_le_bytes());
        }
        format!("{hash:016x}")
    }

    /// Sum of all delays.
    pub fn total_duration_ms(&self) -> u64 {
        self.events.iter().map(|e| e.delay_ms).sum()
    }
}

fn generate_burst(
    rng: &mut SeededRng,
    count: usize,
    interval_ms: u64,
    max_offset: f64,
    row_height: f64,
) -> Vec<ScrollEvent> {
    let mut events = Vec::with_capacity(count);
    let mut offset = rng.next_f64() * max_offset;
    for i in 0..count {
        let rows = rng.next_range(1, 20) as f64;
        let sign = if rng.chance(0.8) { 1.0 } else { -1.0 };
        offset = (offset + sign * rows * row_height).clamp(0.0, max_offset);
        events.push(ScrollEvent::new(offset, interval_ms, i));
    }
    events
}

fn generate_fling(
    rng: &mut SeededRng,
    bursts: usize,
    per_burst: usize,
    pause_ms: u64,
    max_offset: f64,
) -> Vec<ScrollEvent> {
    let mut events = Vec::with_capacity(bursts * per_burst);
    let mut offset = 0.0;
    for burst in 0..bursts {
        let target = rng.next_f64() * max_offset;
        for step in 0..per_burst {
            // Ease-out: most of the distance is covered early.
            let remaining = target - offset;
            offset = (offset + remaining * 0.3).clamp(0.0, max_offset);
            let delay = if step == 0 && burst > 0 {
                pause_ms
            } else {
                rng.next_range(8, 24)
            };
            events.push(ScrollEvent::new(offset, delay, events.len()));
        }
    }
    events
}

fn generate_sweep(steps: usize, interval_ms: u64, max_offset: f64) -> Vec<ScrollEvent> {
    (0..steps)
        .map(|i| {
            let t = if steps > 1 {
                i as f64 / (steps - 1) as f64
            } else {
                1.0
            };
            ScrollEvent::new(max_offset * t, interval_ms, i)
        })
        .collect()
}

// ============================================================================
// State Records
// ============================================================================

/// A popup state observed at a point of virtual time.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    /// Virtual milliseconds since the storm started.
    pub at_ms: u64,
    /// The state.
    pub state: PopupState,
}

impl StateRecord {
    /// Convert to JSONL format.
    pub fn to_jsonl(&self) -> String {
        json!({
            "event": "storm_state",
            "at_ms": self.at_ms,
            "visible": self.state.visible,
            "label": self.state.label,
            "top": self.state.top,
            "left": self.state.left,
        })
        .to_string()
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv_hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

/// Deterministic checksum over a state sequence, for replay comparison.
pub fn state_checksum(records: &[StateRecord]) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for record in records {
        fnv_hash_bytes(&mut hash, &record.at_ms.to_le_bytes());
        fnv_hash_bytes(&mut hash, &[u8::from(record.state.visible)]);
        fnv_hash_bytes(&mut hash, record.state.label.as_bytes());
        fnv_hash_bytes(&mut hash, &[0u8]); // separator
        fnv_hash_bytes(&mut hash, &record.state.top.to_bits().to_le_bytes());
        fnv_hash_bytes(&mut hash, &record.state.left.to_bits().to_le_bytes());
    }
    format!("{hash:016x}")
}

// ============================================================================
// JSONL Logger
// ============================================================================

/// JSONL logger for storm execution.
#[derive(Debug, Default)]
pub struct StormLogger {
    lines: Vec<String>,
}

impl StormLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log storm start.
    pub fn log_start(&mut self, storm: &ScrollStorm) {
        let config = storm.config();
        self.lines.push(
            json!({
                "event": "storm_start",
                "run_id": storm.run_id(),
                "case": config.case_name,
                "seed": config.seed,
                "pattern": config.pattern.name(),
                "provider": config.provider.name(),
                "rows": config.rows,
                "event_count": storm.events().len(),
                "quiet_period_ms": config.popup.quiet_period_ms,
                "label_interval_ms": config.popup.label_interval_ms,
            })
            .to_string(),
        );
    }

    /// Log a scroll.
    pub fn log_scroll(&mut self, event: &ScrollEvent, elapsed_ms: u64) {
        self.lines.push(event.to_jsonl(elapsed_ms));
    }

    /// Log an observed state change.
    pub fn log_state(&mut self, record: &StateRecord) {
        self.lines.push(record.to_jsonl());
    }

    /// Log storm completion.
    pub fn log_complete(&mut self, outcome: &str, stats: &PopupStats, duration_ms: u64, checksum: &str) {
        self.lines.push(
            json!({
                "event": "storm_complete",
                "outcome": outcome,
                "total_scrolls": stats.scroll_events,
                "shows": stats.shows,
                "hides": stats.hides,
                "label_recomputes": stats.label_recomputes,
                "throttled_labels": stats.throttled_labels,
                "duration_ms": duration_ms,
                "checksum": checksum,
            })
            .to_string(),
        );
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines as JSONL.
    pub fn to_jsonl(&self) -> String {
        self.lines.join("\n")
    }
}

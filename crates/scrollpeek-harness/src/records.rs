#![forbid(unsafe_code)]

//! Deterministic mock records.
//!
//! Rows come out in ascending date order, one to a few days apart. A share
//! of rows carry the date only as displayed text, and a smaller share carry
//! no date at all, so the popup's attribute/text fallback and its empty
//! label path both get exercised.

use scrollpeek_runtime::DateRow;
use time::macros::{date, format_description};
use time::{Date, Duration};

// ============================================================================
// Seeded RNG
// ============================================================================

/// Simple LCG PRNG for deterministic generation.
#[derive(Debug, Clone)]
pub(crate) struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform in `[min, max)`; `min` when the range is empty.
    pub(crate) fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % (max - min))
    }

    pub(crate) fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    pub(crate) fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// ============================================================================
// Dates
// ============================================================================

/// `YYYY-MM-DD`, as rows carry it.
pub fn iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// `date` moved forward by `days`, saturating at the calendar's end.
fn step_forward(date: Date, days: u64) -> Date {
    // `Duration::days` panics on overflow; u32::MAX days already overruns
    // the calendar.
    let days = i64::from(u32::try_from(days).unwrap_or(u32::MAX));
    date.checked_add(Duration::days(days)).unwrap_or(Date::MAX)
}

// ============================================================================
// Records
// ============================================================================

/// Shape of the generated record set.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordConfig {
    /// Number of rows.
    pub count: usize,
    /// Date of the first row.
    pub start: Date,
    /// Largest gap between consecutive rows, in days.
    pub max_step_days: u32,
    /// Probability a row carries its date as text only.
    pub text_only_ratio: f64,
    /// Probability a row carries no date.
    pub undated_ratio: f64,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            count: 2_000,
            start: date!(2015 - 01 - 01),
            max_step_days: 3,
            text_only_ratio: 0.2,
            undated_ratio: 0.02,
        }
    }
}

impl RecordConfig {
    /// Set the row count.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// Generate rows for `seed`. Same seed and config, same rows.
pub fn generate_records(seed: u64, config: &RecordConfig) -> Vec<DateRow> {
    let mut rng = SeededRng::new(seed);
    let mut date = config.start;
    let mut rows = Vec::with_capacity(config.count);

    for _ in 0..config.count {
        let row = if rng.chance(config.undated_ratio) {
            DateRow::default()
        } else if rng.chance(config.text_only_ratio) {
            DateRow::with_text(iso_date(date))
        } else {
            DateRow::with_attr(iso_date(date))
        };
        rows.push(row);
        let step = rng.next_range(0, u64::from(config.max_step_days) + 1);
        date = step_forward(date, step);
    }
    rows
}

#![forbid(unsafe_code)]

//! Coarse period labels from row date text.
//!
//! Rows carry their date as `YYYY-MM-DD`. The popup only needs month
//! granularity, so `2024-02-05` becomes `Feb 2024`. The accepted format is
//! strict: anything that is not exactly four digits, a dash, two digits, a
//! dash and two digits is rejected rather than coerced.
//!
//! # Example
//!
//! ```
//! use scrollpeek_core::date_label::parse_label;
//!
//! assert_eq!(parse_label(Some("2024-02-05")).as_deref(), Some("Feb 2024"));
//! assert_eq!(parse_label(Some("2024-2-5")), None);
//! assert_eq!(parse_label(None), None);
//! ```

/// Abbreviated month names. Index 0 is a sentinel and never produced.
pub const MONTH_ABBREVIATIONS: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const CANONICAL_LEN: usize = 10;

/// Parse a canonical `YYYY-MM-DD` date into a `"{Mon} {YYYY}"` label.
///
/// Returns `None` for absent or empty input, wrong field widths, other
/// separators, trailing content, or a month outside `1..=12`.
#[must_use]
pub fn parse_label(text: Option<&str>) -> Option<String> {
    let bytes = text?.as_bytes();
    if bytes.len() != CANONICAL_LEN || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let year = &bytes[0..4];
    let month = &bytes[5..7];
    let day = &bytes[8..10];
    if !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return None;
    }

    let month_index = usize::from((month[0] - b'0') * 10 + (month[1] - b'0'));
    if !(1..=12).contains(&month_index) {
        return None;
    }

    // Digits are ASCII, so the year slice is valid UTF-8.
    let year = std::str::from_utf8(year).ok()?;
    Some(format!("{} {}", MONTH_ABBREVIATIONS[month_index], year))
}

#[inline]
fn all_digits(field: &[u8]) -> bool {
    field.iter().all(u8::is_ascii_digit)
}

/// Turns a row's raw date text into a display label.
///
/// The popup calls this for every label recompute. Hosts that want
/// localized month names supply their own implementation; the default
/// [`IsoMonthLabel`] produces English abbreviations.
pub trait LabelFormatter {
    /// Produce a label, or `None` if the text is not understood.
    fn format_label(&self, text: &str) -> Option<String>;
}

/// The canonical formatter backed by [`parse_label`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoMonthLabel;

impl LabelFormatter for IsoMonthLabel {
    fn format_label(&self, text: &str) -> Option<String> {
        parse_label(Some(text))
    }
}

impl<F> LabelFormatter for F
where
    F: Fn(&str) -> Option<String>,
{
    fn format_label(&self, text: &str) -> Option<String> {
        self(text)
    }
}

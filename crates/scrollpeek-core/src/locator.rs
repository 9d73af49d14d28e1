#![forbid(unsafe_code)]

//! Visible-row location over cached row geometry.
//!
//! Rows are cached as [`RowGeometrySnapshot`]s whose `top` is measured from
//! the content origin of the scroll container. Because the rows mirror a
//! sorted record order with a fixed height per row, the tops are
//! non-decreasing, and the first row not hidden under the header is found by
//! binary search against `scroll offset + header height`.
//!
//! # Invariants
//!
//! - [`locate`] returns the leftmost index with `top >= edge`.
//! - Empty input, or input entirely before the edge, yields `None`.
//! - O(log n) comparisons per call.

/// A cached row: opaque handle, top edge and the raw date text.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometrySnapshot<H> {
    /// Host handle identifying the row.
    pub handle: H,
    /// Top edge relative to the scroll container's content origin.
    pub top: f64,
    /// Date text from the row's designated field, if any.
    pub date_text: Option<String>,
}

impl<H> RowGeometrySnapshot<H> {
    /// Create a snapshot.
    pub fn new(handle: H, top: f64, date_text: Option<String>) -> Self {
        Self {
            handle,
            top,
            date_text,
        }
    }

    /// Borrow the date text.
    #[inline]
    pub fn date_text(&self) -> Option<&str> {
        self.date_text.as_deref()
    }
}

/// Index of the first row whose top edge is at or below `reference_edge`.
///
/// `rows` must be sorted by `top` (non-decreasing). NaN edges match nothing.
#[must_use]
pub fn locate<H>(rows: &[RowGeometrySnapshot<H>], reference_edge: f64) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }

    let mut low = 0usize;
    let mut high = rows.len() - 1;
    let mut best = None;

    loop {
        let mid = low + (high - low) / 2;
        if rows[mid].top >= reference_edge {
            best = Some(mid);
            if mid == 0 {
                break;
            }
            high = mid - 1;
        } else {
            low = mid + 1;
        }
        if low > high {
            break;
        }
    }

    best
}

/// Like [`locate`], returning the snapshot itself.
#[must_use]
pub fn locate_row<H>(
    rows: &[RowGeometrySnapshot<H>],
    reference_edge: f64,
) -> Option<&RowGeometrySnapshot<H>> {
    locate(rows, reference_edge).map(|index| &rows[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(tops: &[f64]) -> Vec<RowGeometrySnapshot<usize>> {
        tops.iter()
            .enumerate()
            .map(|(i, &top)| RowGeometrySnapshot::new(i, top, None))
            .collect()
    }

    fn linear(rows: &[RowGeometrySnapshot<usize>], edge: f64) -> Option<usize> {
        rows.iter().position(|row| row.top >= edge)
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(locate::<usize>(&[], 0.0), None);
    }

    #[test]
    fn single_element() {
        let r = rows(&[10.0]);
        assert_eq!(locate(&r, 5.0), Some(0));
        assert_eq!(locate(&r, 10.0), Some(0));
        assert_eq!(locate(&r, 10.5), None);
    }

    #[test]
    fn boundary_picks_exact_match() {
        let r = rows(&[-50.0, 0.0, 50.0]);
        assert_eq!(locate(&r, 0.0), Some(1));
    }

    #[test]
    fn all_before_edge_is_none() {
        let r = rows(&[0.0, 20.0, 40.0]);
        assert_eq!(locate(&r, 41.0), None);
    }

    #[test]
    fn all_after_edge_is_first() {
        let r = rows(&[100.0, 120.0, 140.0]);
        assert_eq!(locate(&r, 0.0), Some(0));
    }

    #[test]
    fn duplicates_return_leftmost() {
        let r = rows(&[0.0, 20.0, 20.0, 20.0, 40.0]);
        assert_eq!(locate(&r, 20.0), Some(1));
        assert_eq!(locate(&r, 10.0), Some(1));
    }

    #[test]
    fn nan_edge_matches_nothing() {
        let r = rows(&[0.0, 20.0]);
        assert_eq!(locate(&r, f64::NAN), None);
    }

    #[test]
    fn fixed_height_rows_agree_with_linear_scan() {
        let r: Vec<_> = (0..257)
            .map(|i| RowGeometrySnapshot::new(i, 32.0 + i as f64 * 24.0, None))
            .collect();
        for edge in [-1.0, 0.0, 32.0, 33.0, 55.9, 56.0, 3000.0, 6200.0, 6300.0] {
            assert_eq!(locate(&r, edge), linear(&r, edge), "edge={edge}");
        }
    }

    #[test]
    fn locate_row_returns_snapshot() {
        let r = vec![
            RowGeometrySnapshot::new("a", 0.0, Some("2024-01-02".to_string())),
            RowGeometrySnapshot::new("b", 30.0, Some("2024-02-03".to_string())),
        ];
        let row = locate_row(&r, 10.0).expect("row");
        assert_eq!(row.handle, "b");
        assert_eq!(row.date_text(), Some("2024-02-03"));
    }
}

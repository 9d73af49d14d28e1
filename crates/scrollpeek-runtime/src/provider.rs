#![forbid(unsafe_code)]

//! Geometry providers.
//!
//! The popup never touches the host's rendering tree directly. It asks a
//! [`GeometryProvider`] for row snapshots, scroll metrics and bounds, so the
//! lifecycle can be driven against a mock in tests and against either of the
//! two document-backed providers in hosts:
//!
//! - [`ScopedContainer`]: the list lives in its own scroll region. When the
//!   page has no such region every query fails with
//!   [`GeometryError::ContainerUnavailable`].
//! - [`WholeViewport`]: the list scrolls with the page and the screen is the
//!   viewport.

use std::fmt;

use scrollpeek_core::geometry::{ScreenRect, ScrollMetrics};
use scrollpeek_core::locator::RowGeometrySnapshot;

use crate::document::{RowList, SharedDocument};

/// Why a geometry query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The scroll container does not exist.
    ContainerUnavailable,
    /// The container exists but holds no row collection.
    RowsUnavailable,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerUnavailable => write!(f, "scroll container unavailable"),
            Self::RowsUnavailable => write!(f, "row container unavailable"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Read-only geometry queries the popup needs from its host.
pub trait GeometryProvider {
    /// Opaque row identifier.
    type Handle: Clone + fmt::Debug;

    /// Every row with its top edge (from the content origin) and date text,
    /// in ascending order.
    fn row_snapshots(&self) -> Result<Vec<RowGeometrySnapshot<Self::Handle>>, GeometryError>;

    /// Current scroll state of the region.
    fn scroll_metrics(&self) -> Result<ScrollMetrics, GeometryError>;

    /// Screen-space bounds of the region's visible part.
    fn viewport_bounds(&self) -> Result<ScreenRect, GeometryError>;

    /// Height of the whole screen.
    fn screen_height(&self) -> f64;

    /// Width of the whole screen.
    fn screen_width(&self) -> f64;

    /// Height of fixed chrome (a sticky header) covering the top of the
    /// region. Rows above `offset + inset` count as hidden.
    fn reference_inset(&self) -> f64 {
        0.0
    }
}

/// Row handle for document-backed providers: the row's index in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowIndex(pub usize);

fn snapshot_list(list: &RowList) -> Vec<RowGeometrySnapshot<RowIndex>> {
    list.rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            RowGeometrySnapshot::new(RowIndex(i), list.row_top(i), row.date_field().map(str::to_owned))
        })
        .collect()
}

/// Provider for a list inside the document's scoped scroll region.
#[derive(Debug, Clone)]
pub struct ScopedContainer {
    document: SharedDocument,
}

impl ScopedContainer {
    /// Read from `document`'s scroll region.
    pub fn new(document: SharedDocument) -> Self {
        Self { document }
    }

    /// The backing document.
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }
}

impl GeometryProvider for ScopedContainer {
    type Handle = RowIndex;

    fn row_snapshots(&self) -> Result<Vec<RowGeometrySnapshot<RowIndex>>, GeometryError> {
        let doc = self.document.borrow();
        let region = doc.region.as_ref().ok_or(GeometryError::ContainerUnavailable)?;
        Ok(snapshot_list(&region.list))
    }

    fn scroll_metrics(&self) -> Result<ScrollMetrics, GeometryError> {
        let doc = self.document.borrow();
        let region = doc.region.as_ref().ok_or(GeometryError::ContainerUnavailable)?;
        Ok(region.metrics())
    }

    fn viewport_bounds(&self) -> Result<ScreenRect, GeometryError> {
        let doc = self.document.borrow();
        let region = doc.region.as_ref().ok_or(GeometryError::ContainerUnavailable)?;
        Ok(region.bounds)
    }

    fn screen_height(&self) -> f64 {
        self.document.borrow().screen.height
    }

    fn screen_width(&self) -> f64 {
        self.document.borrow().screen.width
    }

    fn reference_inset(&self) -> f64 {
        self.document
            .borrow()
            .region
            .as_ref()
            .map_or(0.0, |region| region.list.header_height)
    }
}

/// Provider for a list that scrolls with the page.
#[derive(Debug, Clone)]
pub struct WholeViewport {
    document: SharedDocument,
}

impl WholeViewport {
    /// Read from `document`'s page-level list.
    pub fn new(document: SharedDocument) -> Self {
        Self { document }
    }

    /// The backing document.
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }
}

impl GeometryProvider for WholeViewport {
    type Handle = RowIndex;

    fn row_snapshots(&self) -> Result<Vec<RowGeometrySnapshot<RowIndex>>, GeometryError> {
        let doc = self.document.borrow();
        let list = doc.page_list.as_ref().ok_or(GeometryError::RowsUnavailable)?;
        Ok(snapshot_list(list))
    }

    fn scroll_metrics(&self) -> Result<ScrollMetrics, GeometryError> {
        // The page itself always exists; without a list there is nothing to
        // scroll.
        let doc = self.document.borrow();
        Ok(doc
            .page_metrics()
            .unwrap_or_else(|| ScrollMetrics::new(0.0, doc.screen.height, doc.screen.height)))
    }

    fn viewport_bounds(&self) -> Result<ScreenRect, GeometryError> {
        Ok(self.document.borrow().screen)
    }

    fn screen_height(&self) -> f64 {
        self.document.borrow().screen.height
    }

    fn screen_width(&self) -> f64 {
        self.document.borrow().screen.width
    }

    fn reference_inset(&self) -> f64 {
        self.document
            .borrow()
            .page_list
            .as_ref()
            .map_or(0.0, |list| list.header_height)
    }
}

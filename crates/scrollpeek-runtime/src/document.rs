#![forbid(unsafe_code)]

//! In-memory host model the geometry providers read from.
//!
//! A [`Document`] stands in for the host's rendering tree: a screen, an
//! optional list laid out directly in the page (scrolled by the page), and
//! an optional scoped [`ScrollRegion`] with its own scroll offset. Rows
//! have a fixed height and sit below a sticky header, matching how the
//! sorted record tables this crate targets are rendered.
//!
//! The document also tracks scroll listeners so hosts and tests can check
//! that a torn-down popup really let go of its activity source.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use scrollpeek_core::geometry::{ScreenRect, ScrollMetrics, sanitize_extent};

use crate::activity::ActivitySource;

/// A document shared between the host and the popup's provider.
pub type SharedDocument = Rc<RefCell<Document>>;

/// One rendered row.
///
/// The date is read from the structured attribute when present, falling
/// back to the displayed text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateRow {
    /// Machine-readable date attribute.
    pub date_attr: Option<String>,
    /// Displayed cell text.
    pub text: Option<String>,
}

impl DateRow {
    /// Row with a structured date attribute.
    pub fn with_attr(date: impl Into<String>) -> Self {
        Self {
            date_attr: Some(date.into()),
            text: None,
        }
    }

    /// Row carrying its date only as displayed text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            date_attr: None,
            text: Some(text.into()),
        }
    }

    /// The designated date field: attribute first, then text.
    pub fn date_field(&self) -> Option<&str> {
        self.date_attr.as_deref().or(self.text.as_deref())
    }
}

/// A fixed-row-height list under a sticky header.
#[derive(Debug, Clone, PartialEq)]
pub struct RowList {
    /// Height of the sticky header above the first row.
    pub header_height: f64,
    /// Height of every row.
    pub row_height: f64,
    /// Rows in ascending date order.
    pub rows: Vec<DateRow>,
}

impl RowList {
    /// Create a list.
    pub fn new(header_height: f64, row_height: f64, rows: Vec<DateRow>) -> Self {
        Self {
            header_height: sanitize_extent(header_height),
            row_height: sanitize_extent(row_height),
            rows,
        }
    }

    /// Top edge of row `index`, measured from the content origin.
    pub fn row_top(&self, index: usize) -> f64 {
        self.header_height + index as f64 * self.row_height
    }

    /// Total content height.
    pub fn content_extent(&self) -> f64 {
        self.row_top(self.rows.len())
    }
}

/// A scoped scrollable region with its own offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRegion {
    /// Screen-space bounds of the visible part.
    pub bounds: ScreenRect,
    /// Current scroll offset.
    pub offset: f64,
    /// Content of the region.
    pub list: RowList,
}

impl ScrollRegion {
    /// Create a region scrolled to the top.
    pub fn new(bounds: ScreenRect, list: RowList) -> Self {
        Self {
            bounds,
            offset: 0.0,
            list,
        }
    }

    /// Scroll metrics of the region.
    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.list.content_extent(), self.bounds.height)
    }

    fn scroll_to(&mut self, offset: f64) -> f64 {
        let max = self.metrics().max_offset();
        self.offset = sanitize_extent(offset).min(max);
        self.offset
    }
}

/// The host's screen and everything on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Screen size; `x` and `y` are normally zero.
    pub screen: ScreenRect,
    /// Page-level scroll offset.
    pub page_offset: f64,
    /// List laid out directly in the page.
    pub page_list: Option<RowList>,
    /// Scoped scroll container, if the page has one.
    pub region: Option<ScrollRegion>,
    listeners: BTreeSet<u64>,
    next_listener: u64,
}

impl Document {
    /// Empty document of the given screen size.
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        Self {
            screen: ScreenRect::from_size(screen_width, screen_height),
            ..Self::default()
        }
    }

    /// Document whose list scrolls with the page.
    pub fn with_page_list(mut self, list: RowList) -> Self {
        self.page_list = Some(list);
        self
    }

    /// Document with a scoped scroll region.
    pub fn with_region(mut self, region: ScrollRegion) -> Self {
        self.region = Some(region);
        self
    }

    /// Wrap for sharing with a provider.
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// Page metrics: content is the page list, viewport is the screen.
    pub fn page_metrics(&self) -> Option<ScrollMetrics> {
        let list = self.page_list.as_ref()?;
        Some(ScrollMetrics::new(
            self.page_offset,
            list.content_extent(),
            self.screen.height,
        ))
    }

    /// Scroll the page, clamped to its range. Returns the applied offset.
    pub fn scroll_page_to(&mut self, offset: f64) -> f64 {
        let max = self.page_metrics().map_or(0.0, |m| m.max_offset());
        self.page_offset = sanitize_extent(offset).min(max);
        self.page_offset
    }

    /// Scroll the scoped region, clamped. Returns `None` without a region.
    pub fn scroll_region_to(&mut self, offset: f64) -> Option<f64> {
        self.region.as_mut().map(|region| region.scroll_to(offset))
    }

    /// Number of attached scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Register a scroll listener on a shared document.
///
/// The returned handle detaches itself when the popup is torn down.
pub fn listen(document: &SharedDocument) -> DocumentListener {
    let mut doc = document.borrow_mut();
    let id = doc.next_listener;
    doc.next_listener += 1;
    doc.listeners.insert(id);
    DocumentListener {
        document: Rc::downgrade(document),
        id,
    }
}

/// Listener registration on a [`Document`].
#[derive(Debug)]
pub struct DocumentListener {
    document: Weak<RefCell<Document>>,
    id: u64,
}

impl ActivitySource for DocumentListener {
    fn detach(&mut self) {
        if let Some(doc) = self.document.upgrade() {
            doc.borrow_mut().listeners.remove(&self.id);
        }
    }
}

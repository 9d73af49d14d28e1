#![forbid(unsafe_code)]

//! scrollpeek public facade crate.
//!
//! Re-exports the popup engine and its pure helpers, plus a prelude and a
//! top-level error type.
//!
//! ```
//! use scrollpeek::prelude::*;
//! use std::time::Instant;
//!
//! let rows = RowList::new(32.0, 24.0, vec![DateRow::with_attr("2024-02-05")]);
//! let doc = Document::new(1024.0, 768.0).with_page_list(rows).into_shared();
//! let mut popup = ScrollPopup::new(WholeViewport::new(doc), PopupConfig::default())?;
//! popup.on_scroll(Instant::now());
//! assert_eq!(popup.state().label, "Feb 2024");
//! # Ok::<(), scrollpeek::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use scrollpeek_core::{
    IndicatorPosition, IsoMonthLabel, LabelFormatter, RowGeometrySnapshot, ScreenRect,
    ScrollMetrics, ThumbEstimate, ThumbGeometry, estimate, estimate_thumb, locate, locate_row,
    parse_label, should_recompute,
};

// --- Runtime re-exports ----------------------------------------------------

pub use scrollpeek_runtime::{
    ActivitySource, ConfigError, DateRow, Document, DocumentListener, GeometryError,
    GeometryProvider, Observable, Phase, PopupConfig, PopupState, PopupStats, RowIndex, RowList,
    ScopedContainer, ScrollPopup, ScrollRegion, SharedDocument, Subscription, WholeViewport,
    listen,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for scrollpeek hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A geometry query failed.
    Geometry(GeometryError),
    /// Configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for scrollpeek APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DateRow, Document, Error, GeometryProvider, LabelFormatter, PopupConfig, PopupState,
        Result, RowList, ScopedContainer, ScrollPopup, ScrollRegion, Subscription, WholeViewport,
    };

    pub use crate::{core, runtime};
}

pub use scrollpeek_core as core;
pub use scrollpeek_runtime as runtime;

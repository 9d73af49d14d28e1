#![forbid(unsafe_code)]

//! Runtime: the scroll popup lifecycle and the seams it talks through.
//!
//! - [`popup`]: the show/hide state machine and its reactive output.
//! - [`provider`]: geometry queries, with scoped-container and
//!   whole-viewport implementations over an in-memory [`document`].
//! - [`activity`]: the detachable scroll listener registration.
//! - [`hide_timer`]: the single caller-driven hide deadline.
//! - [`observable`]: version-tracked shared value with subscriptions.
//! - [`config`]: tunables and validation.

pub mod activity;
pub mod config;
pub mod document;
pub mod hide_timer;
pub mod observable;
pub mod popup;
pub mod provider;

pub use activity::ActivitySource;
pub use config::{ConfigError, PopupConfig};
pub use document::{DateRow, Document, DocumentListener, RowList, ScrollRegion, SharedDocument, listen};
pub use hide_timer::{HideTimer, PendingHide};
pub use observable::{Observable, Subscription};
pub use popup::{Phase, PopupState, PopupStats, ScrollPopup};
pub use provider::{GeometryError, GeometryProvider, RowIndex, ScopedContainer, WholeViewport};

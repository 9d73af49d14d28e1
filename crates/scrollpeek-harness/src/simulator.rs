#![forbid(unsafe_code)]

//! Virtual-clock storm runner.
//!
//! [`ScrollSimulator`] builds a page from mock records, attaches a
//! [`ScrollPopup`] through either provider, and replays a [`ScrollStorm`]
//! against it. Time is virtual: between scrolls the simulator jumps to each
//! pending hide deadline and polls, exactly as a host event loop would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use scrollpeek_core::geometry::{ScreenRect, ScrollMetrics};
use scrollpeek_core::locator::RowGeometrySnapshot;
use scrollpeek_runtime::{
    DateRow, Document, GeometryError, GeometryProvider, PopupStats, RowIndex, RowList,
    ScopedContainer, ScrollPopup, ScrollRegion, SharedDocument, Subscription, WholeViewport,
    listen,
};
use tracing::{debug, info};

use crate::scroll_storm::{
    HarnessError, ProviderKind, ScrollStorm, StateRecord, StormConfig, StormLogger, state_checksum,
};

/// Either document-backed provider, chosen at run time.
#[derive(Debug, Clone)]
pub enum DocumentProvider {
    /// Page-level scrolling.
    Page(WholeViewport),
    /// Scoped scroll region.
    Scoped(ScopedContainer),
}

impl GeometryProvider for DocumentProvider {
    type Handle = RowIndex;

    fn row_snapshots(&self) -> Result<Vec<RowGeometrySnapshot<RowIndex>>, GeometryError> {
        match self {
            Self::Page(p) => p.row_snapshots(),
            Self::Scoped(p) => p.row_snapshots(),
        }
    }

    fn scroll_metrics(&self) -> Result<ScrollMetrics, GeometryError> {
        match self {
            Self::Page(p) => p.scroll_metrics(),
            Self::Scoped(p) => p.scroll_metrics(),
        }
    }

    fn viewport_bounds(&self) -> Result<ScreenRect, GeometryError> {
        match self {
            Self::Page(p) => p.viewport_bounds(),
            Self::Scoped(p) => p.viewport_bounds(),
        }
    }

    fn screen_height(&self) -> f64 {
        match self {
            Self::Page(p) => p.screen_height(),
            Self::Scoped(p) => p.screen_height(),
        }
    }

    fn screen_width(&self) -> f64 {
        match self {
            Self::Page(p) => p.screen_width(),
            Self::Scoped(p) => p.screen_width(),
        }
    }

    fn reference_inset(&self) -> f64 {
        match self {
            Self::Page(p) => p.reference_inset(),
            Self::Scoped(p) => p.reference_inset(),
        }
    }
}

/// Outcome of one storm run.
#[derive(Debug, Clone)]
pub struct StormResult {
    /// Every state change, in order.
    pub states: Vec<StateRecord>,
    /// Popup counters at the end of the run.
    pub stats: PopupStats,
    /// Checksum over `states`.
    pub checksum: String,
    /// Virtual run length (ms).
    pub duration_ms: u64,
    /// Full JSONL trace.
    pub jsonl: String,
    /// Whether the popup ended hidden.
    pub ended_hidden: bool,
    /// Scroll listeners still attached after teardown.
    pub leaked_listeners: usize,
}

impl StormResult {
    /// Whether the run satisfied the lifecycle expectations.
    pub fn passed(&self) -> bool {
        self.ended_hidden && self.leaked_listeners == 0 && self.stats.shows == self.stats.hides
    }
}

/// Drives a popup through a storm on a virtual clock.
pub struct ScrollSimulator {
    document: SharedDocument,
    provider: ProviderKind,
    popup: ScrollPopup<DocumentProvider>,
    base: Instant,
    clock_ms: Rc<Cell<u64>>,
    states: Rc<RefCell<Vec<StateRecord>>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for ScrollSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSimulator")
            .field("provider", &self.provider)
            .field("clock_ms", &self.clock_ms.get())
            .field("popup", &self.popup)
            .finish_non_exhaustive()
    }
}

impl ScrollSimulator {
    /// Build the page described by `config` over `rows`.
    pub fn new(config: &StormConfig, rows: Vec<DateRow>) -> Result<Self, HarnessError> {
        let (width, height) = config.screen;
        let list = RowList::new(config.header_height, config.row_height, rows);
        let (document, provider) = match config.provider {
            ProviderKind::WholeViewport => {
                let doc = Document::new(width, height).with_page_list(list).into_shared();
                let provider = DocumentProvider::Page(WholeViewport::new(Rc::clone(&doc)));
                (doc, provider)
            }
            ProviderKind::ScopedContainer => {
                let bounds = ScreenRect::new(width * 0.1, 64.0, width * 0.6, (height - 128.0).max(0.0));
                let doc = Document::new(width, height)
                    .with_region(ScrollRegion::new(bounds, list))
                    .into_shared();
                let provider = DocumentProvider::Scoped(ScopedContainer::new(Rc::clone(&doc)));
                (doc, provider)
            }
        };

        let mut popup = ScrollPopup::new(provider, config.popup.clone())?;
        popup.attach_source(listen(&document));
        popup.set_initial_label_from_first_row();

        let clock_ms = Rc::new(Cell::new(0));
        let states = Rc::new(RefCell::new(Vec::new()));
        let subscription = {
            let clock_ms = Rc::clone(&clock_ms);
            let states = Rc::clone(&states);
            popup.subscribe(move |state| {
                states.borrow_mut().push(StateRecord {
                    at_ms: clock_ms.get(),
                    state: state.clone(),
                });
            })
        };

        Ok(Self {
            document,
            provider: config.provider,
            popup,
            base: Instant::now(),
            clock_ms,
            states,
            _subscription: subscription,
        })
    }

    /// Largest reachable scroll offset on this page.
    pub fn max_offset(&self) -> f64 {
        let doc = self.document.borrow();
        let metrics = match self.provider {
            ProviderKind::WholeViewport => doc.page_metrics(),
            ProviderKind::ScopedContainer => doc.region.as_ref().map(ScrollRegion::metrics),
        };
        metrics.map_or(0.0, |m| m.max_offset())
    }

    /// The popup under test.
    pub fn popup(&self) -> &ScrollPopup<DocumentProvider> {
        &self.popup
    }

    /// The simulated page.
    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    fn instant(&self, ms: u64) -> Instant {
        self.base + Duration::from_millis(ms)
    }

    /// Jump the clock to `target_ms`, firing any hide deadline on the way.
    fn advance_to(&mut self, target_ms: u64) {
        while let Some(deadline) = self.popup.next_deadline() {
            let deadline_ms = deadline
                .checked_duration_since(self.base)
                .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
            if deadline_ms > target_ms {
                break;
            }
            self.clock_ms.set(deadline_ms.max(self.clock_ms.get()));
            // A hide that finds fresh activity re-arms later, so this ends.
            self.popup.poll(deadline);
        }
        self.clock_ms.set(target_ms.max(self.clock_ms.get()));
    }

    fn scroll_to(&mut self, offset: f64) {
        let mut doc = self.document.borrow_mut();
        match self.provider {
            ProviderKind::WholeViewport => {
                doc.scroll_page_to(offset);
            }
            ProviderKind::ScopedContainer => {
                doc.scroll_region_to(offset);
            }
        }
    }

    /// Replay `storm`, then let the popup settle and tear it down.
    pub fn run(mut self, storm: &ScrollStorm) -> StormResult {
        let mut logger = StormLogger::new();
        logger.log_start(storm);
        info!(
            run_id = storm.run_id(),
            pattern = storm.config().pattern.name(),
            provider = self.provider.name(),
            events = storm.events().len(),
            "storm started"
        );

        let mut elapsed = 0u64;
        let mut logged = self.states.borrow().len();
        for event in storm.events() {
            elapsed = elapsed.saturating_add(event.delay_ms);
            self.advance_to(elapsed);
            self.scroll_to(event.offset);
            self.popup.on_scroll(self.instant(elapsed));
            logger.log_scroll(event, elapsed);
            logged = self.flush_states(&mut logger, logged);
        }

        if let Some(deadline) = self.popup.next_deadline() {
            let settle_ms = deadline
                .checked_duration_since(self.base)
                .map_or(elapsed, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
            self.advance_to(settle_ms);
        }
        self.flush_states(&mut logger, logged);

        let ended_hidden = !self.popup.state().visible;
        self.popup.teardown();
        let leaked_listeners = self.document.borrow().listener_count();

        let states = self.states.borrow().clone();
        let checksum = state_checksum(&states);
        let stats = self.popup.stats();
        let duration_ms = self.clock_ms.get();
        let mut result = StormResult {
            states,
            stats,
            checksum,
            duration_ms,
            jsonl: String::new(),
            ended_hidden,
            leaked_listeners,
        };
        let outcome = if result.passed() { "pass" } else { "fail" };
        logger.log_complete(outcome, &result.stats, duration_ms, &result.checksum);
        debug!(
            checksum = %result.checksum,
            outcome,
            states = result.states.len(),
            "storm complete"
        );
        result.jsonl = logger.to_jsonl();
        result
    }

    fn flush_states(&self, logger: &mut StormLogger, from: usize) -> usize {
        let states = self.states.borrow();
        for record in &states[from..] {
            logger.log_state(record);
        }
        states.len()
    }
}

/// Generate records, build the page and run the storm described by
/// `config`.
pub fn run_storm(config: &StormConfig) -> Result<StormResult, HarnessError> {
    let records = crate::records::RecordConfig::default().with_count(config.rows);
    let rows = crate::records::generate_records(config.seed, &records);
    let simulator = ScrollSimulator::new(config, rows)?;
    let storm = ScrollStorm::new(config.clone(), simulator.max_offset());
    Ok(simulator.run(&storm))
}

#![forbid(unsafe_code)]

//! Scroll storm harness for scrollpeek.
//!
//! - [`records`]: deterministic ascending mock records.
//! - [`scroll_storm`]: storm patterns, JSONL logging and checksums.
//! - [`simulator`]: virtual-clock replay against either geometry provider.
//!
//! # Quick Start
//!
//! ```
//! use scrollpeek_harness::scroll_storm::{StormConfig, StormPattern};
//! use scrollpeek_harness::simulator::run_storm;
//!
//! let config = StormConfig::default()
//!     .with_seed(42)
//!     .with_rows(500)
//!     .with_pattern(StormPattern::Burst { count: 20, interval_ms: 16 });
//! let result = run_storm(&config).unwrap();
//! assert!(result.passed());
//! ```

pub mod records;
pub mod scroll_storm;
pub mod simulator;

pub use records::{RecordConfig, generate_records, iso_date};
pub use scroll_storm::{
    HarnessError, ProviderKind, ScrollEvent, ScrollStorm, StateRecord, StormConfig, StormLogger,
    StormPattern, state_checksum,
};
pub use simulator::{DocumentProvider, ScrollSimulator, StormResult, run_storm};

#![forbid(unsafe_code)]

//! Scroll storm runner.
//!
//! Replays a deterministic scroll storm against the popup and writes the
//! JSONL trace to stdout. Diagnostics go to stderr.
//!
//! # Running
//!
//! ```sh
//! SCROLLPEEK_SEED=42 SCROLLPEEK_PATTERN=fling cargo run -p scrollpeek-harness
//! ```
//!
//! # Environment
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SCROLLPEEK_SEED` | RNG seed | `0` |
//! | `SCROLLPEEK_PATTERN` | `burst`, `fling`, `sweep`, `custom:OFF@MS,...` | `burst` |
//! | `SCROLLPEEK_ROWS` | Mock row count | `2000` |
//! | `SCROLLPEEK_PROVIDER` | `whole_viewport` or `scoped_container` | `whole_viewport` |
//! | `SCROLLPEEK_CONFIG` | Path to a JSON popup config | built-in defaults |
//! | `SCROLLPEEK_LOG` | Tracing filter | `info` |

use std::io::{self, Write};
use std::process::ExitCode;

use scrollpeek_harness::{HarnessError, StormConfig, run_storm};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCROLLPEEK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<bool, HarnessError> {
    let config = StormConfig::from_lookup(
        |key| std::env::var(key).ok(),
        |path| std::fs::read_to_string(path),
    )?;
    let result = run_storm(&config)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", result.jsonl)?;
    stdout.flush()?;

    tracing::info!(
        checksum = %result.checksum,
        shows = result.stats.shows,
        hides = result.stats.hides,
        duration_ms = result.duration_ms,
        "storm finished"
    );
    Ok(result.passed())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::error!("storm failed lifecycle checks");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "storm could not run");
            eprintln!("scrollpeek-harness: {err}");
            ExitCode::from(2)
        }
    }
}

#![forbid(unsafe_code)]

//! Recompute throttling.
//!
//! The throttle holds no state of its own: the caller keeps the instant of
//! its last recompute and stores `now` whenever [`should_recompute`] says
//! yes. That keeps the lifecycle machine the single owner of every clock
//! reading.

use std::time::{Duration, Instant};

/// Whether enough time has passed since `last_recompute`.
///
/// - `None` (never recomputed) always allows.
/// - A clock reading earlier than `last_recompute` never allows.
#[inline]
#[must_use]
pub fn should_recompute(
    now: Instant,
    last_recompute: Option<Instant>,
    min_interval: Duration,
) -> bool {
    match last_recompute {
        None => true,
        Some(last) => now
            .checked_duration_since(last)
            .is_some_and(|elapsed| elapsed >= min_interval),
    }
}

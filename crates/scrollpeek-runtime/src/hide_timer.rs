#![forbid(unsafe_code)]

//! Single-shot hide timer driven by the caller's clock.
//!
//! No OS timer is involved. The host asks for [`HideTimer::deadline`] to
//! schedule its wakeup and hands the current instant to
//! [`HideTimer::take_expired`].
//!
//! # Invariants
//!
//! 1. At most one hide is pending; [`HideTimer::arm`] replaces it.
//! 2. Every arm gets a fresh generation, so a stale expiry can be told
//!    apart from the current one.
//! 3. A cancelled timer never expires.

use std::time::Instant;

/// A pending hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingHide {
    /// When the hide fires.
    pub deadline: Instant,
    /// Arm counter value at the time this hide was armed.
    pub generation: u64,
}

/// One optional pending hide deadline.
#[derive(Debug, Clone, Default)]
pub struct HideTimer {
    pending: Option<PendingHide>,
    generation: u64,
}

impl HideTimer {
    /// An idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `deadline`, replacing any pending hide.
    pub fn arm(&mut self, deadline: Instant) -> PendingHide {
        self.generation = self.generation.wrapping_add(1);
        let pending = PendingHide {
            deadline,
            generation: self.generation,
        };
        self.pending = Some(pending);
        pending
    }

    /// Drop the pending hide. Returns it if there was one.
    pub fn cancel(&mut self) -> Option<PendingHide> {
        self.pending.take()
    }

    /// Deadline of the pending hide.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Whether a hide is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of times the timer has been armed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Remove and return the pending hide if its deadline is at or before
    /// `now`.
    pub fn take_expired(&mut self, now: Instant) -> Option<PendingHide> {
        match self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take(),
            _ => None,
        }
    }
}

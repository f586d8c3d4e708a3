//! Hourly rollup scheduler.
//!
//! Republishes the rain window's total on a fixed cadence aligned to
//! wall-clock boundaries, independent of whether new samples arrived.
//!
//! ```text
//!  start(10:42:17)
//!      │  first delay = 3600 - (now mod 3600 s) = 1063 s
//!      ▼
//!  ────┼──────────┬────────────────┬────────────────┬──────▶ wall clock
//!   10:42:17    11:00:00        12:00:00        13:00:00
//!                 fire            fire            fire
//! ```
//!
//! Like the watchdog it is clock-free: the control loop passes `now_ms`
//! to [`RollupScheduler::poll`] and acts on the returned flag.

use log::{info, warn};

// ═══════════════════════════════════════════════════════════════
//  Alignment
// ═══════════════════════════════════════════════════════════════

/// Seconds from `now_ms` until the next multiple of `interval_secs` on
/// the epoch clock.
///
/// Sub-second remainders are truncated, so a start time exactly on a
/// boundary waits a full interval.  A zero interval has no grid and
/// yields 0.
pub fn initial_delay_secs(now_ms: u64, interval_secs: u32) -> u64 {
    if interval_secs == 0 {
        return 0;
    }
    let interval_secs = u64::from(interval_secs);
    interval_secs - (now_ms % (interval_secs * 1000)) / 1000
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RollupState {
    Stopped,
    Scheduled { next_due_ms: u64 },
}

pub struct RollupScheduler {
    interval_secs: u32,
    state: RollupState,
    /// Firings delivered since `start`.
    fired: u64,
}

impl RollupScheduler {
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            state: RollupState::Stopped,
            fired: 0,
        }
    }

    /// Schedule the first firing on the next aligned boundary.
    ///
    /// A scheduler built with a zero interval never starts.
    pub fn start(&mut self, now_ms: u64) {
        if self.interval_secs == 0 {
            warn!("Rollup: zero interval, not scheduling");
            self.state = RollupState::Stopped;
            return;
        }
        let delay = initial_delay_secs(now_ms, self.interval_secs);
        let next_due_ms = now_ms + delay * 1000;
        info!(
            "Rollup: first firing in {}s, then every {}s",
            delay, self.interval_secs
        );
        self.state = RollupState::Scheduled { next_due_ms };
        self.fired = 0;
    }

    /// Stop firing.  Safe to call repeatedly or before `start`.
    pub fn cancel(&mut self) {
        if let RollupState::Scheduled { .. } = self.state {
            info!("Rollup: cancelled after {} firings", self.fired);
        }
        self.state = RollupState::Stopped;
    }

    /// Returns `true` when a firing is due at `now_ms`.
    ///
    /// The next deadline stays on the interval grid.  If the caller fell
    /// more than one interval behind, the missed slots collapse into this
    /// single firing.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let RollupState::Scheduled { next_due_ms } = self.state else {
            return false;
        };
        if now_ms < next_due_ms {
            return false;
        }

        let interval_ms = u64::from(self.interval_secs) * 1000;
        let missed = (now_ms - next_due_ms) / interval_ms;
        if missed > 0 {
            warn!("Rollup: {} slot(s) missed, firing once", missed);
        }
        self.state = RollupState::Scheduled {
            next_due_ms: next_due_ms + (missed + 1) * interval_ms,
        };
        self.fired += 1;
        true
    }

    pub fn next_due(&self) -> Option<u64> {
        match self.state {
            RollupState::Scheduled { next_due_ms } => Some(next_due_ms),
            RollupState::Stopped => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due().is_some()
    }

    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

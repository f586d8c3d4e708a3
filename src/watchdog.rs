//! Availability watchdog.
//!
//! A single-shot, re-armable deadline.  The session arms it on every
//! accepted reading and on the bridge coming online; if the deadline
//! passes without a re-arm the sensor is declared offline.
//!
//! ```text
//!            arm()                    poll(now >= deadline)
//!   Idle ──────────▶ Armed(deadline) ───────────────────────▶ Fired
//!    ▲                 │    ▲  arm()                          │
//!    │   cancel()      │    └─────────────────────────────────┘
//!    └─────────────────┘              arm()
//! ```
//!
//! The watchdog holds no clock: the caller passes `now_ms` and drives
//! expiry through [`AvailabilityWatchdog::poll`].  At most one deadline
//! is outstanding because arming overwrites the previous one.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    Idle,
    Armed { deadline_ms: u64 },
    Fired,
}

pub struct AvailabilityWatchdog {
    timeout_ms: u64,
    state: WatchdogState,
}

impl AvailabilityWatchdog {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            state: WatchdogState::Idle,
        }
    }

    /// Cancel any pending deadline and start a fresh one at
    /// `now_ms + timeout`.
    pub fn arm(&mut self, now_ms: u64) {
        let deadline_ms = now_ms.saturating_add(self.timeout_ms);
        debug!("Watchdog: armed until {}", deadline_ms);
        self.state = WatchdogState::Armed { deadline_ms };
    }

    /// Drop any pending deadline.  Cancelling an idle or fired watchdog
    /// is a no-op.
    pub fn cancel(&mut self) {
        if let WatchdogState::Armed { .. } = self.state {
            debug!("Watchdog: cancelled");
        }
        self.state = WatchdogState::Idle;
    }

    /// Returns `true` exactly once when the armed deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.state {
            WatchdogState::Armed { deadline_ms } if now_ms >= deadline_ms => {
                self.state = WatchdogState::Fired;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn deadline(&self) -> Option<u64> {
        match self.state {
            WatchdogState::Armed { deadline_ms } => Some(deadline_ms),
            _ => None,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

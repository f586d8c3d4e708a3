//! System clock adapter.
//!
//! Provides wall-clock time to the sensor core through [`ClockPort`].
//! Wall-clock (not monotonic) time is used because rollups align to hour
//! boundaries; a clock stepping backwards only delays the next deadline.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::ports::ClockPort;

/// `ClockPort` backed by `std::time::SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

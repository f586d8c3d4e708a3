//! Sliding time window over the rain gauge's 8-bit tip counter.
//!
//! The transmitter reports a cumulative tip count that wraps modulo 256.
//! Samples are keyed by arrival time; [`WrappingCounterWindow::total`]
//! evicts everything older than the window and reports how far the
//! counter advanced between the earliest and the latest retained sample.
//!
//! ## Known simplification
//!
//! The total is the delta between the *earliest* retained sample and the
//! *last* one visited, corrected for at most one wrap:
//!
//! ```text
//!  [10, 250]       → 250 - 10        = 240
//!  [250, 10]       → 256 - 250 + 10  = 16
//!  [250, 10, 200]  → 200 < 250, so 256 - 250 + 200 = 206
//! ```
//!
//! Intermediate samples do not accumulate, and a window spanning more
//! than one full wrap under-counts.  Downstream rainfall figures depend
//! on this exact arithmetic, so it is kept as is.

use alloc::collections::BTreeMap;

/// Counter modulus.
const COUNTER_RANGE: u32 = 256;

pub struct WrappingCounterWindow {
    period_ms: u64,
    /// Arrival time (epoch ms) → raw counter value.
    samples: BTreeMap<u64, u8>,
}

impl WrappingCounterWindow {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            samples: BTreeMap::new(),
        }
    }

    /// Record a counter sample taken at `now_ms`.
    ///
    /// A second sample with the same timestamp replaces the first.  Never
    /// evicts; expiry happens in [`total`](Self::total).
    pub fn put(&mut self, now_ms: u64, value: u8) {
        self.samples.insert(now_ms, value);
    }

    /// Evict samples older than the window and return the net counter
    /// advance across what remains.
    pub fn total(&mut self, now_ms: u64) -> u32 {
        let oldest_kept = now_ms.saturating_sub(self.period_ms);
        self.samples = self.samples.split_off(&oldest_kept);

        let mut least: Option<u32> = None;
        let mut total = 0;
        for &value in self.samples.values() {
            let value = u32::from(value);
            match least {
                None => least = Some(value),
                Some(least) if value < least => total = COUNTER_RANGE - least + value,
                Some(least) => total = value - least,
            }
        }
        total
    }

    /// Retained sample count (including any not yet evicted).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

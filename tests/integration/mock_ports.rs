//! Mock port adapters for integration tests.
//!
//! `ManualClock` lets a test step wall-clock time explicitly;
//! `TickingClock` advances on every read; `RecordingSink` keeps every emitted event so tests can assert on the
//! full publication history.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use meteostick::app::events::{AppEvent, Availability, ChannelId, ChannelValue};
use meteostick::app::ports::{ClockPort, EventSink};
use meteostick::app::service::SensorSession;
use meteostick::config::SensorConfig;

/// 2023-11-14 22:00:00 UTC, an exact hour boundary.
pub const HOUR_BOUNDARY_MS: u64 = 1_699_999_200_000;
pub const HOUR_MS: u64 = 3_600_000;

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock(AtomicU64);

#[allow(dead_code)]
impl ManualClock {
    pub fn new(now_ms: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(now_ms)))
    }

    pub fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

// ── TickingClock ──────────────────────────────────────────────

/// Clock that moves forward by `step_ms` on every read, so each caller
/// observes a distinct, later time.
pub struct TickingClock {
    next_ms: AtomicU64,
    step_ms: u64,
}

#[allow(dead_code)]
impl TickingClock {
    pub fn new(start_ms: u64, step_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            next_ms: AtomicU64::new(start_ms),
            step_ms,
        })
    }

    /// Latest time handed out so far.
    pub fn last_read_ms(&self) -> u64 {
        self.next_ms.load(Ordering::SeqCst) - self.step_ms
    }
}

impl ClockPort for TickingClock {
    fn now_ms(&self) -> u64 {
        self.next_ms.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value published on `channel`, oldest first.
    pub fn values(&self, channel: ChannelId) -> Vec<ChannelValue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ChannelUpdated { channel: c, value } if *c == channel => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn last_number(&self, channel: ChannelId) -> Option<f32> {
        self.values(channel).last().map(|v| v.as_f32())
    }

    pub fn availability_changes(&self) -> Vec<Availability> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::AvailabilityChanged(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub type TestSession = SensorSession<Arc<ManualClock>>;

/// Default-config session starting at `now_ms`.
pub fn make_session(now_ms: u64) -> (TestSession, Arc<ManualClock>, RecordingSink) {
    let clock = ManualClock::new(now_ms);
    let session = SensorSession::new(&SensorConfig::default(), Arc::clone(&clock))
        .expect("default config is valid");
    (session, clock, RecordingSink::new())
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

//! Port traits: the hexagonal boundary between the sensor core and the
//! outside world.
//!
//! ```text
//!   Transport ──▶ SensorHandler ──▶ SensorSession ──▶ EventSink ──▶ state store
//!                                        ▲
//!                                    ClockPort
//! ```
//!
//! The session never reaches back into its host.  The host drives it
//! through [`SensorHandler`] and receives results through [`EventSink`].

use alloc::sync::Arc;

use crate::error::DecodeError;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: system time → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock source.  Epoch milliseconds are required because rollups
/// align to wall-clock hour boundaries.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

impl<C: ClockPort + ?Sized> ClockPort for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: ClockPort + ?Sized> ClockPort for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → state store / logging)
// ───────────────────────────────────────────────────────────────

/// The session emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Sensor handler (driving port: host → domain)
// ───────────────────────────────────────────────────────────────

/// Link state of the receiver bridge the sensor is reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Online,
    Offline,
}

/// Narrow interface an orchestrator uses to drive one sensor.
pub trait SensorHandler {
    /// Feed one framed report.  Rejected lines are returned as errors and
    /// leave availability untouched.
    fn on_reading(&self, fields: &[&str], sink: &mut dyn EventSink) -> Result<(), DecodeError>;

    /// React to the receiver bridge changing state.
    fn on_bridge_status(&self, status: BridgeStatus, sink: &mut dyn EventSink);

    /// Cancel all timers.  Idempotent.
    fn dispose(&self);
}

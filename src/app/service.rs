//! Sensor session, the hexagonal core.
//!
//! [`SensorSession`] owns the rain window, the availability watchdog and
//! the rollup scheduler for one transmitter.  It is the only entry point
//! for incoming reports and bridge transitions.
//!
//! ```text
//!  fields ──▶ decode ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                        │        SensorSession          │
//!  BridgeStatus ───────▶ │  window · watchdog · rollup   │
//!  poll() ─────────────▶ └───────────────────────────────┘
//!                                    ▲
//!                                ClockPort
//! ```
//!
//! ## Concurrency
//!
//! All mutable state sits behind one blocking mutex, so a reading, a
//! bridge transition, a timer poll and `dispose` each run as one
//! serialised step.  The step reads the clock and re-arms the watchdog
//! (cancel + schedule) while holding the lock, so two concurrent readings
//! leave one deadline, taken from whichever reading applied last.  Events are collected while the lock is held and emitted
//! after it is released; sinks may take as long as they like.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, info, warn};

use crate::config::SensorConfig;
use crate::error::{DecodeError, Result};
use crate::scheduler::RollupScheduler;
use crate::sensors::SensorReading;
use crate::sensors::decoder::decode;
use crate::sensors::window::WrappingCounterWindow;
use crate::watchdog::AvailabilityWatchdog;

use super::events::{AppEvent, Availability, ChannelId, ChannelValue, OfflineReason};
use super::ports::{BridgeStatus, ClockPort, EventSink, SensorHandler};

/// Most events a single step can produce (a wind report: availability,
/// speed, direction, signal, battery).
const OUTBOX_CAP: usize = 8;

type Outbox = heapless::Vec<AppEvent, OUTBOX_CAP>;

// ───────────────────────────────────────────────────────────────
// Session state
// ───────────────────────────────────────────────────────────────

struct SessionState {
    window: WrappingCounterWindow,
    watchdog: AvailabilityWatchdog,
    rollup: RollupScheduler,
    availability: Availability,
    /// Set while the bridge is offline; watchdog arming is suspended.
    bridge_down: bool,
    last_data_ms: Option<u64>,
    disposed: bool,
}

impl SessionState {
    fn set_availability(&mut self, next: Availability, out: &mut Outbox) {
        if self.availability == next {
            return;
        }
        info!("Availability: {:?} -> {:?}", self.availability, next);
        self.availability = next;
        queue(out, AppEvent::AvailabilityChanged(next));
    }
}

fn queue(out: &mut Outbox, event: AppEvent) {
    if out.push(event).is_err() {
        warn!("Session outbox full, event dropped");
    }
}

fn publish(out: &mut Outbox, channel: ChannelId, value: ChannelValue) {
    queue(out, AppEvent::ChannelUpdated { channel, value });
}

// ───────────────────────────────────────────────────────────────
// SensorSession
// ───────────────────────────────────────────────────────────────

pub struct SensorSession<C: ClockPort> {
    clock: C,
    channel: u8,
    spoon_mm: f32,
    state: Mutex<CriticalSectionRawMutex, RefCell<SessionState>>,
}

impl<C: ClockPort> SensorSession<C> {
    /// Validate `config`, build the session and start the rollup.
    ///
    /// Availability starts as [`Availability::Unknown`]; the watchdog
    /// stays idle until the first reading or bridge-online transition.
    pub fn new(config: &SensorConfig, clock: C) -> Result<Self> {
        config.validate()?;

        let mut rollup = RollupScheduler::new(config.rollup_interval_secs);
        rollup.start(clock.now_ms());

        info!(
            "Sensor channel {}: spoon {} mm, window {}s, offline after {}s",
            config.channel,
            config.spoon_mm,
            config.window_period_secs,
            config.watchdog_timeout_secs
        );

        let state = SessionState {
            window: WrappingCounterWindow::new(config.window_period_ms()),
            watchdog: AvailabilityWatchdog::new(config.watchdog_timeout_ms()),
            rollup,
            availability: Availability::Unknown,
            bridge_down: false,
            last_data_ms: None,
            disposed: false,
        };

        Ok(Self {
            clock,
            channel: config.channel,
            spoon_mm: config.spoon_mm,
            state: Mutex::new(RefCell::new(state)),
        })
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Decode and apply one report.
    ///
    /// Malformed lines are logged and returned; they never count as data
    /// received.
    pub fn on_reading(
        &self,
        fields: &[&str],
        sink: &mut dyn EventSink,
    ) -> core::result::Result<(), DecodeError> {
        let reading = decode(fields).inspect_err(|e| {
            warn!("Sensor {}: dropped report {:?}: {}", self.channel, fields, e);
        })?;

        self.transact(sink, |st, now, out| {
            if st.disposed {
                debug!("Sensor {}: report after dispose ignored", self.channel);
                return;
            }
            debug!("Sensor {}: {:?}", self.channel, reading);

            st.last_data_ms = Some(now);
            if !st.bridge_down {
                st.set_availability(Availability::Online, out);
                st.watchdog.arm(now);
            }

            match reading {
                SensorReading::Rain { counter, .. } => {
                    publish(out, ChannelId::RainRaw, ChannelValue::Number(f32::from(counter)));
                }
                SensorReading::Wind {
                    speed_ms,
                    direction_deg,
                    ..
                } => {
                    publish(out, ChannelId::WindSpeed, ChannelValue::Number(speed_ms));
                    publish(
                        out,
                        ChannelId::WindDirection,
                        ChannelValue::Number(f32::from(direction_deg)),
                    );
                }
                SensorReading::Temperature {
                    celsius,
                    humidity_pct,
                    ..
                } => {
                    publish(out, ChannelId::OutdoorTemperature, ChannelValue::Number(celsius));
                    publish(out, ChannelId::Humidity, ChannelValue::Number(humidity_pct));
                }
                SensorReading::Solar { power, .. } => {
                    publish(out, ChannelId::SolarPower, ChannelValue::Number(power));
                }
            }

            publish(
                out,
                ChannelId::SignalStrength,
                ChannelValue::Number(f32::from(reading.signal_bars())),
            );
            publish(out, ChannelId::LowBattery, ChannelValue::Switch(reading.battery_low()));

            if let SensorReading::Rain { counter, .. } = reading {
                st.window.put(now, counter);
                let rainfall = self.rainfall_mm(st.window.total(now));
                publish(out, ChannelId::RainCurrentHour, ChannelValue::Number(rainfall));
            }
        });
        Ok(())
    }

    /// Apply a bridge transition.
    ///
    /// Offline forces this sensor offline and suspends the watchdog;
    /// online marks it online and arms the watchdog from now.
    pub fn on_bridge_status(&self, status: BridgeStatus, sink: &mut dyn EventSink) {
        self.transact(sink, |st, now, out| {
            if st.disposed {
                return;
            }
            match status {
                BridgeStatus::Offline => {
                    info!("Sensor {}: bridge offline", self.channel);
                    st.bridge_down = true;
                    st.watchdog.cancel();
                    st.set_availability(Availability::Offline(OfflineReason::BridgeOffline), out);
                }
                BridgeStatus::Online => {
                    info!("Sensor {}: bridge online", self.channel);
                    st.bridge_down = false;
                    st.set_availability(Availability::Online, out);
                    st.watchdog.arm(now);
                }
            }
        });
    }

    /// Drive timers.  Call periodically from the control loop; a deadline
    /// is delivered by the first poll at or after it.
    pub fn poll(&self, sink: &mut dyn EventSink) {
        self.transact(sink, |st, now, out| {
            if st.disposed {
                return;
            }
            if st.watchdog.poll(now) {
                warn!("Sensor {}: no data for {}s", self.channel, st.watchdog.timeout_ms() / 1000);
                let reason = OfflineReason::CommunicationLost {
                    last_data_ms: st.last_data_ms,
                };
                st.set_availability(Availability::Offline(reason), out);
            }
            if st.rollup.poll(now) {
                let rainfall = self.rainfall_mm(st.window.total(now));
                info!("Sensor {}: last hour rainfall {} mm", self.channel, rainfall);
                publish(out, ChannelId::RainLastHour, ChannelValue::Number(rainfall));
            }
        });
    }

    /// Cancel the watchdog and the rollup.  Repeated calls are no-ops.
    pub fn dispose(&self) {
        self.state.lock(|cell| {
            let mut st = cell.borrow_mut();
            if st.disposed {
                return;
            }
            st.watchdog.cancel();
            st.rollup.cancel();
            st.disposed = true;
            info!("Sensor {}: disposed", self.channel);
        });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn availability(&self) -> Availability {
        self.state.lock(|cell| cell.borrow().availability)
    }

    /// Epoch-ms time of the last accepted reading.
    pub fn last_data_ms(&self) -> Option<u64> {
        self.state.lock(|cell| cell.borrow().last_data_ms)
    }

    /// Rainfall across the current window.  Evicts expired samples.
    pub fn rain_current_hour_mm(&self) -> f32 {
        let ticks = self
            .state
            .lock(|cell| cell.borrow_mut().window.total(self.clock.now_ms()));
        self.rainfall_mm(ticks)
    }

    /// Next rollup deadline, or `None` once disposed.
    pub fn next_rollup_ms(&self) -> Option<u64> {
        self.state.lock(|cell| cell.borrow().rollup.next_due())
    }

    /// Pending watchdog deadline, if armed.
    pub fn watchdog_deadline_ms(&self) -> Option<u64> {
        self.state.lock(|cell| cell.borrow().watchdog.deadline())
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock(|cell| cell.borrow().disposed)
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    // ── Internal ──────────────────────────────────────────────

    fn rainfall_mm(&self, ticks: u32) -> f32 {
        ticks as f32 * self.spoon_mm
    }

    /// Run `f` under the state lock, then emit whatever it queued.
    ///
    /// The clock is read after the lock is taken, so steps see
    /// non-decreasing times in the order they apply.
    fn transact<R>(
        &self,
        sink: &mut dyn EventSink,
        f: impl FnOnce(&mut SessionState, u64, &mut Outbox) -> R,
    ) -> R {
        let mut out = Outbox::new();
        let result = self.state.lock(|cell| {
            let now = self.clock.now_ms();
            f(&mut *cell.borrow_mut(), now, &mut out)
        });
        for event in &out {
            sink.emit(event);
        }
        result
    }
}

impl<C: ClockPort> SensorHandler for SensorSession<C> {
    fn on_reading(
        &self,
        fields: &[&str],
        sink: &mut dyn EventSink,
    ) -> core::result::Result<(), DecodeError> {
        SensorSession::on_reading(self, fields, sink)
    }

    fn on_bridge_status(&self, status: BridgeStatus, sink: &mut dyn EventSink) {
        SensorSession::on_bridge_status(self, status, sink);
    }

    fn dispose(&self) {
        SensorSession::dispose(self);
    }
}

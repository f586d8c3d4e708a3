//! Outbound application events.
//!
//! The [`SensorSession`](super::service::SensorSession) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, update an item
//! registry, publish over MQTT, etc.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Channels
// ───────────────────────────────────────────────────────────────

/// Logical channels a sensor session publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Raw tip counter as reported (0-255).
    RainRaw,
    /// Rainfall over the sliding window, refreshed on every rain report.
    RainCurrentHour,
    /// Rainfall over the sliding window, refreshed by the hourly rollup.
    RainLastHour,
    WindSpeed,
    WindDirection,
    OutdoorTemperature,
    Humidity,
    SolarPower,
    /// Received signal as 0-4 bars.
    SignalStrength,
    LowBattery,
}

impl ChannelId {
    /// Stable identifier used by external state stores.
    pub const fn id(self) -> &'static str {
        match self {
            Self::RainRaw => "rain-raw",
            Self::RainCurrentHour => "rain-currenthour",
            Self::RainLastHour => "rain-lasthour",
            Self::WindSpeed => "wind-speed",
            Self::WindDirection => "wind-direction",
            Self::OutdoorTemperature => "outdoor-temperature",
            Self::Humidity => "humidity",
            Self::SolarPower => "solar-power",
            Self::SignalStrength => "signal-strength",
            Self::LowBattery => "low-battery",
        }
    }

    pub const fn unit(self) -> Unit {
        match self {
            Self::RainCurrentHour | Self::RainLastHour => Unit::Millimetre,
            Self::WindSpeed => Unit::MetrePerSecond,
            Self::WindDirection => Unit::Degree,
            Self::OutdoorTemperature => Unit::Celsius,
            Self::Humidity => Unit::Percent,
            Self::RainRaw | Self::SolarPower | Self::SignalStrength | Self::LowBattery => {
                Unit::None
            }
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    None,
    Millimetre,
    MetrePerSecond,
    Degree,
    Celsius,
    Percent,
}

impl Unit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Millimetre => "mm",
            Self::MetrePerSecond => "m/s",
            Self::Degree => "\u{00b0}",
            Self::Celsius => "\u{00b0}C",
            Self::Percent => "%",
        }
    }
}

/// Value carried by a channel update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelValue {
    Number(f32),
    Switch(bool),
}

impl ChannelValue {
    /// Numeric view; switches read as 1.0 / 0.0.
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Number(v) => v,
            Self::Switch(on) => {
                if on {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Availability
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineReason {
    /// The receiver bridge itself went offline.
    BridgeOffline,
    /// The watchdog expired.  Carries the epoch-ms time of the last
    /// accepted reading, if any.
    CommunicationLost { last_data_ms: Option<u64> },
}

impl fmt::Display for OfflineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BridgeOffline => write!(f, "Bridge offline"),
            Self::CommunicationLost { last_data_ms: None } => write!(f, "No data received"),
            Self::CommunicationLost {
                last_data_ms: Some(ms),
            } => write!(f, "No data received since {}.{:03}s (epoch)", ms / 1000, ms % 1000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Unknown,
    Online,
    Offline(OfflineReason),
}

impl Availability {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

// ───────────────────────────────────────────────────────────────
// Events
// ───────────────────────────────────────────────────────────────

/// Structured events emitted by a sensor session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A derived metric was (re)computed.
    ChannelUpdated { channel: ChannelId, value: ChannelValue },

    /// The sensor's availability changed.
    AvailabilityChanged(Availability),
}

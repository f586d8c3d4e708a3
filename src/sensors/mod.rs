//! Sensor subsystem: typed readings, the line decoder, and the rain
//! counter window.
//!
//! A Meteostick receiver forwards one text line per transmitter packet.
//! [`decoder`] turns the split line into a [`SensorReading`]; rain
//! readings additionally feed the [`window::WrappingCounterWindow`].

pub mod decoder;
pub mod window;

/// One decoded transmitter report.
///
/// Produced by [`decoder::decode`] and consumed immediately by the
/// session; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorReading {
    /// Tipping-bucket counter (wraps modulo 256).
    Rain {
        counter: u8,
        signal_dbm: f32,
        battery_low: bool,
    },
    Wind {
        speed_ms: f32,
        direction_deg: u16,
        signal_dbm: f32,
        battery_low: bool,
    },
    Temperature {
        celsius: f32,
        humidity_pct: f32,
        signal_dbm: f32,
        battery_low: bool,
    },
    /// Solar panel output, in the transmitter's raw power unit.
    Solar {
        power: f32,
        signal_dbm: f32,
        battery_low: bool,
    },
}

impl SensorReading {
    pub fn signal_dbm(&self) -> f32 {
        match *self {
            Self::Rain { signal_dbm, .. }
            | Self::Wind { signal_dbm, .. }
            | Self::Temperature { signal_dbm, .. }
            | Self::Solar { signal_dbm, .. } => signal_dbm,
        }
    }

    /// Signal strength as a 0-4 bar count.
    pub fn signal_bars(&self) -> u8 {
        signal_bars(self.signal_dbm())
    }

    pub fn battery_low(&self) -> bool {
        match *self {
            Self::Rain { battery_low, .. }
            | Self::Wind { battery_low, .. }
            | Self::Temperature { battery_low, .. }
            | Self::Solar { battery_low, .. } => battery_low,
        }
    }

    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rain { .. } => "rain",
            Self::Wind { .. } => "wind",
            Self::Temperature { .. } => "temperature",
            Self::Solar { .. } => "solar",
        }
    }
}

/// Bucket a received signal level into 0-4 bars.
///
/// Comparisons are strict, so a level exactly on a threshold falls into
/// the lower bucket (-60 dBm is 3 bars, not 4).
pub fn signal_bars(dbm: f32) -> u8 {
    if dbm > -60.0 {
        4
    } else if dbm > -70.0 {
        3
    } else if dbm > -80.0 {
        2
    } else if dbm > -90.0 {
        1
    } else {
        0
    }
}

//! Sensor session configuration
//!
//! All tunable parameters for one Meteostick sensor session.
//! Values are supplied by the host (JSON file, provisioning, etc.) and
//! validated once when the session is built.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest radio channel a Meteostick receiver listens on.
pub const MAX_CHANNEL: u8 = 8;

/// Per-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Radio channel of the transmitter (1-8)
    pub channel: u8,
    /// Rainfall represented by one bucket tip, in millimetres
    pub spoon_mm: f32,

    // --- Timing ---
    /// Sliding window retained for the current-hour rain total (seconds)
    pub window_period_secs: u32,
    /// Silence after which the sensor is declared offline (seconds)
    pub watchdog_timeout_secs: u32,
    /// Rollup period, aligned to wall-clock multiples of itself (seconds)
    pub rollup_interval_secs: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            channel: 1,
            spoon_mm: 0.254, // 0.01 in Davis bucket

            window_period_secs: 3600,
            watchdog_timeout_secs: 90,
            rollup_interval_secs: 3600,
        }
    }
}

impl SensorConfig {
    /// Reject values that would make the session meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.channel == 0 || self.channel > MAX_CHANNEL {
            return Err(Error::Config("channel must be within 1..=8"));
        }
        if !self.spoon_mm.is_finite() || self.spoon_mm <= 0.0 {
            return Err(Error::Config("spoon_mm must be a positive number"));
        }
        if self.window_period_secs == 0 {
            return Err(Error::Config("window_period_secs must be non-zero"));
        }
        if self.watchdog_timeout_secs == 0 {
            return Err(Error::Config("watchdog_timeout_secs must be non-zero"));
        }
        if self.rollup_interval_secs == 0 {
            return Err(Error::Config("rollup_interval_secs must be non-zero"));
        }
        Ok(())
    }

    pub fn window_period_ms(&self) -> u64 {
        u64::from(self.window_period_secs) * 1000
    }

    pub fn watchdog_timeout_ms(&self) -> u64 {
        u64::from(self.watchdog_timeout_secs) * 1000
    }
}

//! Meteostick report decoder.
//!
//! The receiver emits one line per packet, already split into fields by
//! the transport framer:
//!
//! ```text
//!  tag  id   ...values...        dBm   [battery]
//!  R    1    57                  -65   L
//!  W    1    3.2      180        -95
//!  T    1    21.5     55.0       -82   L
//!  P    1    12.0                -71
//! ```
//!
//! There is no dedicated battery field.  A transmitter with a low battery
//! appends one extra field, so `battery_low` is true exactly when the
//! field count is one above the variant's minimal arity.  Any other
//! surplus is ignored.

use core::str::FromStr;

use crate::error::DecodeError;

use super::SensorReading;

/// Minimal field counts per variant (tag and id included).
const RAIN_ARITY: usize = 4;
const WIND_ARITY: usize = 5;
const TEMPERATURE_ARITY: usize = 5;
const SOLAR_ARITY: usize = 4;

/// Decode one split report into a typed reading.
pub fn decode(fields: &[&str]) -> Result<SensorReading, DecodeError> {
    let tag = fields
        .first()
        .map(|t| t.trim())
        .ok_or(DecodeError::MalformedField { index: 0 })?;

    match tag {
        "R" => Ok(SensorReading::Rain {
            counter: parse_field(fields, 2)?,
            signal_dbm: parse_float(fields, 3)?,
            battery_low: fields.len() == RAIN_ARITY + 1,
        }),
        "W" => Ok(SensorReading::Wind {
            speed_ms: parse_float(fields, 2)?,
            direction_deg: parse_field(fields, 3)?,
            signal_dbm: parse_float(fields, 4)?,
            battery_low: fields.len() == WIND_ARITY + 1,
        }),
        "T" => Ok(SensorReading::Temperature {
            celsius: parse_float(fields, 2)?,
            humidity_pct: parse_float(fields, 3)?,
            signal_dbm: parse_float(fields, 4)?,
            battery_low: fields.len() == TEMPERATURE_ARITY + 1,
        }),
        "P" => Ok(SensorReading::Solar {
            power: parse_float(fields, 2)?,
            signal_dbm: parse_float(fields, 3)?,
            battery_low: fields.len() == SOLAR_ARITY + 1,
        }),
        _ => Err(DecodeError::UnknownTag),
    }
}

/// Fields of a raw receiver line.  Commas and ASCII whitespace both
/// separate fields; runs of separators count as one.
pub fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|f| !f.is_empty())
}

/// Split a raw receiver line with [`split_fields`] and decode it.
pub fn decode_line(line: &str) -> Result<SensorReading, DecodeError> {
    let mut fields: heapless::Vec<&str, 16> = heapless::Vec::new();
    for field in split_fields(line) {
        // Surplus beyond the buffer never changes the outcome: the longest
        // recognised arity is six fields.
        if fields.push(field).is_err() {
            break;
        }
    }
    decode(&fields)
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize) -> Result<T, DecodeError> {
    fields
        .get(index)
        .and_then(|f| f.trim().parse().ok())
        .ok_or(DecodeError::MalformedField { index })
}

fn parse_float(fields: &[&str], index: usize) -> Result<f32, DecodeError> {
    let value: f32 = parse_field(fields, index)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DecodeError::MalformedField { index })
    }
}

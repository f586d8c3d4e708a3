//! Application core: pure domain logic, zero I/O.
//!
//! Orchestrates decoding, rain accumulation, the availability watchdog and
//! the hourly rollup for one sensor.  All interaction with the host
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without a receiver attached.

pub mod events;
pub mod ports;
pub mod service;

//! Meteostick sensor core.
//!
//! Decodes Meteostick receiver reports, keeps the rain gauge's sliding
//! hourly accumulation, watches for loss of communication and republishes
//! rainfall on an hourly schedule.  Transport, configuration storage and
//! the state store are external; they meet the core at the port traits in
//! [`app::ports`].

#![deny(unused_must_use)]

extern crate alloc;

pub mod app;
pub mod channels;
pub mod config;
pub mod scheduler;
pub mod sensors;
pub mod watchdog;

pub mod adapters;

mod error;

pub use error::{DecodeError, Error, Result};

//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to             |
//! |------------|------------|-------------------------|
//! | `log_sink` | EventSink  | `log` facade output     |
//! | `time`     | ClockPort  | `std::time::SystemTime` |

pub mod log_sink;
pub mod time;

//! Transport-to-control-loop channel.
//!
//! Uses an `embassy-sync` bounded channel to hand framed lines from the
//! blocking reader thread to the control loop, which drains it between
//! timer polls without ever blocking.
//!
//! ```text
//! ┌──────────────┐   ReportLine   ┌──────────────┐
//! │ Reader thread│──────────────▶│ Control loop  │
//! │  (blocking)  │               │ (250 ms ticks)│
//! └──────────────┘               └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;

use crate::app::ports::BridgeStatus;

/// Longest report line kept; receivers emit well under this.
pub const MAX_LINE_LEN: usize = 128;

/// One raw report line as read from the transport.
pub type ReportLine = String<MAX_LINE_LEN>;

/// Channel depth for report lines.
const LINE_DEPTH: usize = 16;

/// Inbound line channel: reader thread → control loop.
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, ReportLine, LINE_DEPTH> = Channel::new();

/// Latest transport link state, latched until the control loop takes it.
pub static BRIDGE_SIGNAL: Signal<CriticalSectionRawMutex, BridgeStatus> = Signal::new();

/// Copy `line` into a [`ReportLine`], or `None` if it is too long.
pub fn to_report_line(line: &str) -> Option<ReportLine> {
    let mut buf = ReportLine::new();
    buf.push_str(line.trim_end()).ok()?;
    Some(buf)
}

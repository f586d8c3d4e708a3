//! Meteostick host runner.
//!
//! Reads receiver lines from stdin (pipe a serial port into it), feeds
//! the ones addressed to the configured channel into a [`SensorSession`],
//! and polls the session's timers once per tick.
//!
//! ```text
//! ┌──────────────┐  LINE_CHANNEL  ┌──────────────────────────────┐
//! │ stdin reader │──────────────▶│ control loop                  │
//! │   thread     │  BRIDGE_SIGNAL │  on_reading · poll · dispose  │
//! └──────────────┘──────────────▶│          │                    │
//!                                 │          ▼                    │
//!                                 │     LogEventSink              │
//!                                 └──────────────────────────────┘
//! ```
//!
//! Usage: `meteostick [config.json]`, logging via `RUST_LOG`.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use embassy_sync::channel::TrySendError;
use log::{error, info, warn};

use meteostick::adapters::log_sink::LogEventSink;
use meteostick::adapters::time::SystemClock;
use meteostick::app::ports::{BridgeStatus, ClockPort, EventSink};
use meteostick::app::service::SensorSession;
use meteostick::channels::{BRIDGE_SIGNAL, LINE_CHANNEL, to_report_line};
use meteostick::config::SensorConfig;
use meteostick::sensors::decoder::split_fields;

/// Control loop period.
const TICK: Duration = Duration::from_millis(250);

/// Back-off while the line channel is full.
const SEND_RETRY: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::init();
    info!("Meteostick v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (file or defaults) ───────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => {
            info!("No config file given, using defaults");
            SensorConfig::default()
        }
    };

    // ── 3. Session ────────────────────────────────────────────
    let session = SensorSession::new(&config, SystemClock::new())?;
    let mut sink = LogEventSink::new(config.channel);

    // ── 4. Transport reader ───────────────────────────────────
    let _reader = thread::Builder::new()
        .name("transport".into())
        .spawn(read_transport)
        .context("spawning transport reader")?;
    session.on_bridge_status(BridgeStatus::Online, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        drain_lines(&session, config.channel, &mut sink);

        if let Some(status) = BRIDGE_SIGNAL.try_take() {
            if status == BridgeStatus::Offline {
                // The reader queues its last lines before raising Offline.
                drain_lines(&session, config.channel, &mut sink);
                session.on_bridge_status(status, &mut sink);
                break;
            }
            session.on_bridge_status(status, &mut sink);
        }

        session.poll(&mut sink);
        thread::sleep(TICK);
    }

    session.dispose();
    info!("Transport closed after {} events, exiting", sink.emitted());
    Ok(())
}

fn load_config(path: &str) -> Result<SensorConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config: SensorConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    info!("Loaded config from {}", path);
    Ok(config)
}

/// Feed every queued line addressed to `channel` into the session.
fn drain_lines<C: ClockPort>(session: &SensorSession<C>, channel: u8, sink: &mut dyn EventSink) {
    while let Ok(line) = LINE_CHANNEL.try_receive() {
        let fields: Vec<&str> = split_fields(&line).collect();
        if !addressed_to(&fields, channel) {
            continue;
        }
        // Decode failures are already logged by the session.
        let _ = session.on_reading(&fields, sink);
    }
}

/// Reports carry the transmitter channel in their second field.  Lines
/// without one (receiver banners, echoes) are skipped.
fn addressed_to(fields: &[&str], channel: u8) -> bool {
    fields
        .get(1)
        .and_then(|f| f.parse::<u8>().ok())
        .is_some_and(|c| c == channel)
}

/// Blocking stdin reader.  Signals the bridge offline on EOF or error.
fn read_transport() {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Transport read failed: {}", e);
                break;
            }
        };
        let Some(mut report) = to_report_line(&line) else {
            warn!("Oversized line dropped ({} bytes)", line.len());
            continue;
        };
        loop {
            match LINE_CHANNEL.try_send(report) {
                Ok(()) => break,
                Err(TrySendError::Full(back)) => {
                    report = back;
                    thread::sleep(SEND_RETRY);
                }
            }
        }
    }
    BRIDGE_SIGNAL.signal(BridgeStatus::Offline);
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every session event to the `log`
//! facade.  A state-store or MQTT adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::{AppEvent, Availability, ChannelValue};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`], tagged with the sensor channel.
pub struct LogEventSink {
    channel: u8,
    emitted: u64,
}

impl LogEventSink {
    pub fn new(channel: u8) -> Self {
        Self { channel, emitted: 0 }
    }

    /// Events written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::ChannelUpdated { channel, value } => match value {
                ChannelValue::Number(v) => {
                    info!(
                        "STATE | ch{} | {}={}{}",
                        self.channel,
                        channel,
                        v,
                        channel.unit().symbol()
                    );
                }
                ChannelValue::Switch(on) => {
                    info!(
                        "STATE | ch{} | {}={}",
                        self.channel,
                        channel,
                        if *on { "ON" } else { "OFF" }
                    );
                }
            },
            AppEvent::AvailabilityChanged(Availability::Offline(reason)) => {
                warn!("STATUS | ch{} | OFFLINE ({})", self.channel, reason);
            }
            AppEvent::AvailabilityChanged(state) => {
                info!("STATUS | ch{} | {:?}", self.channel, state);
            }
        }
    }
}

//! High-level bulb operations.
//!
//! Each operation is one blocking request/response exchange. A reply that
//! fails validation is not an error: the operation returns `Ok(None)` and the
//! reason is reported to the decoder's observer.

use aurabulb_protocol::{
    stuff, AlarmSetting, AlarmTime, Command, FrameObserver, LightLevel, LightMode, LogObserver,
    Response, ResponseDecoder, Rgb, SystemTime, Unstuffing,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::transport::Transport;

/// Configuration for a bulb client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Drop the greeting the bulb sends after a connection is opened.
    pub discard_greeting: bool,
    /// Unescape replies before checking them.
    pub symmetric_unstuffing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            discard_greeting: true,
            symmetric_unstuffing: false,
        }
    }
}

impl ClientConfig {
    /// Get the reply unstuffing policy.
    pub fn unstuffing(&self) -> Unstuffing {
        if self.symmetric_unstuffing {
            Unstuffing::Symmetric
        } else {
            Unstuffing::Legacy
        }
    }
}

/// A connected AuraBulb.
pub struct AuraBulb<T, O = LogObserver> {
    transport: T,
    decoder: ResponseDecoder<O>,
    exchanges: u64,
}

impl<T: Transport> AuraBulb<T> {
    /// Create a client that logs through the `log` facade.
    pub fn new(transport: T) -> Self {
        AuraBulb::with_observer(transport, LogObserver, Unstuffing::default())
    }
}

impl<T: Transport, O: FrameObserver> AuraBulb<T, O> {
    /// Create a client reporting frames to `observer`.
    pub fn with_observer(transport: T, observer: O, unstuffing: Unstuffing) -> Self {
        AuraBulb {
            transport,
            decoder: ResponseDecoder::new(observer).with_unstuffing(unstuffing),
            exchanges: 0,
        }
    }

    /// Get the observer.
    pub fn observer(&self) -> &O {
        self.decoder.observer()
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the number of completed exchanges.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Send a command and decode its reply.
    pub fn execute(&mut self, command: &Command) -> ClientResult<Option<Response>> {
        let id = command.id();
        let inner = command.inner_frame();
        let wire = stuff(&inner);
        self.decoder.observer().frame_encoded(id, &inner, &wire);

        let reply = self.transport.exchange(&wire)?;
        self.exchanges += 1;

        let response = self.decoder.decode(&reply);
        match &response {
            Some(response) => debug!(command = ?id, kind = response.kind(), "reply decoded"),
            None => warn!(command = ?id, "no valid reply"),
        }
        Ok(response)
    }

    /// Toggle the light between off and its last level.
    pub fn toggle_light(&mut self) -> ClientResult<Option<Response>> {
        self.execute(&Command::ToggleLight)
    }

    /// Read the light level, `0..=210`.
    pub fn get_light_level(&mut self) -> ClientResult<Option<u8>> {
        Ok(match self.execute(&Command::GetLightLevel)? {
            Some(Response::LightLevel { level }) => Some(level),
            other => unexpected("light level", other),
        })
    }

    /// Set the light level.
    pub fn set_light_level(&mut self, level: LightLevel) -> ClientResult<Option<Response>> {
        self.execute(&Command::SetLightLevel { level })
    }

    /// Read the colour as raw reply bytes.
    ///
    /// The AuraBulb does not answer this reliably.
    pub fn get_light_color(&mut self) -> ClientResult<Option<Vec<u8>>> {
        Ok(match self.execute(&Command::GetColor)? {
            Some(Response::Raw { data, .. }) => Some(data),
            other => unexpected("colour", other),
        })
    }

    /// Set the colour.
    pub fn set_light_color(&mut self, color: Rgb) -> ClientResult<Option<Response>> {
        self.execute(&Command::SetColor { color })
    }

    /// Set the light mode.
    pub fn set_light_mode(&mut self, mode: LightMode) -> ClientResult<Option<Response>> {
        self.execute(&Command::SetLightMode { mode })
    }

    /// Read the battery voltage.
    pub fn get_voltage(&mut self) -> ClientResult<Option<u8>> {
        Ok(match self.execute(&Command::GetVoltage)? {
            Some(Response::Voltage { level }) => Some(level),
            other => unexpected("voltage", other),
        })
    }

    /// Set the bulb's clock.
    pub fn set_time(&mut self, now: NaiveDateTime) -> ClientResult<Option<Response>> {
        let time = SystemTime::from_naive_datetime(now)?;
        self.execute(&Command::SetSystemTime { time })
    }

    /// Set the alarm.
    pub fn set_alarm_time(
        &mut self,
        time: AlarmTime,
        scene: u8,
        enabled: bool,
    ) -> ClientResult<Option<Response>> {
        self.execute(&Command::SetAlarm {
            time,
            scene,
            enabled,
        })
    }

    /// Read the alarm.
    pub fn get_alarm_time(&mut self) -> ClientResult<Option<AlarmSetting>> {
        Ok(match self.execute(&Command::GetAlarm)? {
            Some(Response::Alarm(alarm)) => Some(alarm),
            other => unexpected("alarm", other),
        })
    }
}

/// Log a reply of the wrong kind and treat it as no result.
fn unexpected<R>(wanted: &str, response: Option<Response>) -> Option<R> {
    if let Some(response) = response {
        warn!(wanted, got = response.kind(), "unexpected reply kind");
    }
    None
}

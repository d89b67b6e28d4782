//! Argument and result types used in the protocol.
//!
//! Every argument type that the firmware only accepts within a range is
//! validated when it is constructed, so a [`Command`](crate::Command) can
//! never carry a value that would be truncated on the wire.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

use crate::constants::*;
use crate::error::*;

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> ProtocolResult<()> {
    if value < min || value > max {
        return Err(ProtocolError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Brightness of the bulb, `0..=MAX_LIGHT_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LightLevel(u8);

impl LightLevel {
    /// Light fully off.
    pub const OFF: LightLevel = LightLevel(0);
    /// Brightest level.
    pub const MAX: LightLevel = LightLevel(MAX_LIGHT_LEVEL);

    /// Create a light level, rejecting values above [`MAX_LIGHT_LEVEL`].
    pub fn new(level: u8) -> ProtocolResult<Self> {
        check_range("light level", level.into(), 0, MAX_LIGHT_LEVEL.into())?;
        Ok(LightLevel(level))
    }

    /// Get the raw level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LightLevel {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LightLevel::new(value)
    }
}

/// Light mode, `MIN_LIGHT_MODE..=MAX_LIGHT_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightMode(u8);

impl LightMode {
    /// Create a light mode, rejecting values outside the supported range.
    pub fn new(mode: u8) -> ProtocolResult<Self> {
        check_range(
            "light mode",
            mode.into(),
            MIN_LIGHT_MODE.into(),
            MAX_LIGHT_MODE.into(),
        )?;
        Ok(LightMode(mode))
    }

    /// Get the raw mode.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LightMode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LightMode::new(value)
    }
}

/// A colour as three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Create a colour.
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    /// White at full intensity.
    pub fn white() -> Self {
        Rgb::new(0xff, 0xff, 0xff)
    }

    /// Get the channels in wire order.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Time of day at which the alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Create an alarm time, rejecting hours above 23 and minutes above 59.
    pub fn new(hour: u8, minute: u8) -> ProtocolResult<Self> {
        check_range("hour", hour.into(), 0, 23)?;
        check_range("minute", minute.into(), 0, 59)?;
        Ok(AlarmTime { hour, minute })
    }

    /// Create an alarm time from a time of day. Seconds are dropped.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        AlarmTime {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Get the hour.
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Get the minute.
    pub fn minute(self) -> u8 {
        self.minute
    }
}

/// Alarm configuration as reported by the bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlarmSetting {
    /// Hour of day.
    pub hour: u8,
    /// Minute of hour.
    pub minute: u8,
    /// Scene played when the alarm fires.
    pub scene: u8,
    /// Whether the alarm is armed.
    pub enabled: bool,
}

/// Wall clock time in the layout the bulb's clock expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    /// 0 = Monday .. 6 = Sunday.
    weekday: u8,
}

impl SystemTime {
    /// Latest year whose century still fits in one byte.
    pub const MAX_YEAR: i32 = 255 * 100 + 99;

    /// Create from a calendar date and time.
    pub fn from_naive_datetime(dt: NaiveDateTime) -> ProtocolResult<Self> {
        check_range("year", dt.year().into(), 0, Self::MAX_YEAR.into())?;
        Ok(SystemTime {
            year: dt.year() as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            // leap seconds come through as second 59
            second: dt.second().min(59) as u8,
            weekday: dt.weekday().num_days_from_monday() as u8,
        })
    }

    /// Encode as `[year % 100, year / 100, month, day, hour, minute, second, weekday]`.
    pub fn to_bytes(self) -> [u8; 8] {
        [
            (self.year % 100) as u8,
            (self.year / 100) as u8,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.weekday,
        ]
    }
}

/// Helper to encode bytes as hex.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

//! Configuration file handling.
//!
//! Everything in the file can also be given on the command line; flags win.
//!
//! ```yaml
//! device: /dev/rfcomm0
//! read_timeout_ms: 5000
//! discard_greeting: true
//! symmetric_unstuffing: false
//! wakeup:
//!   start: "07:30"
//!   end: "08:00"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use aurabulb_client::ClientConfig;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Contents of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Serial device node of the bound RFCOMM channel.
    pub device: Option<PathBuf>,
    /// Address of a TCP bridge to the serial link.
    pub tcp: Option<String>,
    /// Read timeout for the TCP bridge, in milliseconds.
    pub read_timeout_ms: Option<u64>,
    /// Client behaviour.
    #[serde(flatten)]
    pub client: ClientConfig,
    /// Wake-up window.
    pub wakeup: Option<WakeupConfig>,
}

/// Wake-up window as times of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupConfig {
    /// Time the ramp starts, `HH:MM` or `HH:MM:SS`.
    pub start: String,
    /// Time the ramp reaches full brightness.
    pub end: String,
}

impl FileConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config file contents.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// Parse a time of day given as `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(text: &str) -> CliResult<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|_| CliError::InvalidTime(text.to_string()))
}

/// Place a wake-up window on `day`. A window whose end is not after its
/// start runs past midnight and ends the next day.
pub fn wakeup_window(
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(start);
    let mut end = day.and_time(end);
    if end <= start {
        end += TimeDelta::days(1);
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = FileConfig::parse(
            "device: /dev/rfcomm0\n\
             read_timeout_ms: 2500\n\
             discard_greeting: false\n\
             symmetric_unstuffing: true\n\
             wakeup:\n  start: \"07:30\"\n  end: \"08:00\"\n",
        )
        .unwrap();

        assert_eq!(config.device, Some(PathBuf::from("/dev/rfcomm0")));
        assert_eq!(config.tcp, None);
        assert_eq!(config.read_timeout_ms, Some(2500));
        assert!(!config.client.discard_greeting);
        assert!(config.client.symmetric_unstuffing);
        assert_eq!(
            config.wakeup,
            Some(WakeupConfig {
                start: "07:30".to_string(),
                end: "08:00".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_defaults() {
        let config = FileConfig::parse("tcp: 127.0.0.1:7000\n").unwrap();
        assert_eq!(config.tcp.as_deref(), Some("127.0.0.1:7000"));
        assert!(config.client.discard_greeting);
        assert!(!config.client.symmetric_unstuffing);
        assert!(config.wakeup.is_none());
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("08:00").unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("22:04:30").unwrap(),
            NaiveTime::from_hms_opt(22, 4, 30).unwrap()
        );
        assert!(matches!(
            parse_time_of_day("25:00"),
            Err(CliError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_wakeup_window_crossing_midnight() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (start, end) = wakeup_window(
            day,
            NaiveTime::from_hms_opt(23, 50, 0).unwrap(),
            NaiveTime::from_hms_opt(0, 20, 0).unwrap(),
        );
        assert_eq!(start.date(), day);
        assert_eq!(end.date(), day.succ_opt().unwrap());
        assert_eq!(end - start, TimeDelta::minutes(30));
    }

    #[test]
    fn test_wakeup_window_same_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (start, end) = wakeup_window(
            day,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        );
        assert_eq!(end.date(), day);
        assert_eq!(end - start, TimeDelta::minutes(30));
    }
}

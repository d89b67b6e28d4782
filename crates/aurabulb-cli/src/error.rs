//! Error types for the command-line tool.

use std::io;
use std::path::PathBuf;

use aurabulb_client::ClientError;
use aurabulb_protocol::ProtocolError;
use thiserror::Error;

/// Errors reported by the `aurabulb` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The config file is not valid YAML for this tool.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },

    /// Neither a device node nor a TCP bridge was given.
    #[error("no link configured: pass --device or --tcp, or set one in the config file")]
    NoLink,

    /// A time of day that could not be parsed.
    #[error("invalid time of day '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    /// The wake-up subcommand was run without start and end times.
    #[error("wake-up needs --start and --end, or a wakeup block in the config file")]
    NoWakeupWindow,

    /// Failed to open the link.
    #[error("failed to open link: {0}")]
    Connect(#[source] io::Error),

    /// An argument was out of range.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Talking to the bulb failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Result type alias for the command-line tool.
pub type CliResult<T> = Result<T, CliError>;

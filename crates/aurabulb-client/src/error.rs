//! Error types for the client.

use std::io;

use aurabulb_protocol::ProtocolError;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur when talking to a bulb.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The link to the bulb failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// A command argument was rejected before anything was sent.
    #[error("invalid argument: {0}")]
    Protocol(#[from] ProtocolError),

    /// A wake-up ramp that ends before it starts.
    #[error("wake-up ramp must end after it starts ({start} >= {end})")]
    InvalidRamp {
        /// Ramp start.
        start: NaiveDateTime,
        /// Ramp end.
        end: NaiveDateTime,
    },
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

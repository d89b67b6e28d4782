//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when building commands for the bulb.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Byte does not name a command in the command table.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Argument outside the range the bulb accepts.
    #[error("{field} out of range: {value} not in {min}..={max}")]
    OutOfRange {
        /// Name of the offending argument.
        field: &'static str,
        /// Value supplied by the caller.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Why a reply frame was not accepted.
///
/// Rejections are an expected outcome on a noisy wireless link, so they are
/// reported to a [`FrameObserver`](crate::FrameObserver) instead of being
/// returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer bytes than the fixed reply header.
    TooShort {
        /// Length of the received frame.
        len: usize,
    },
    /// First byte is not STX.
    BadStart(u8),
    /// Last byte is not ETX.
    BadEnd(u8),
    /// Byte 3 is not the reply marker.
    BadMarker(u8),
    /// Byte 5 is not the success sentinel.
    NotSuccess(u8),
    /// Reply too short for the structured payload of its command.
    PayloadTooShort {
        /// Echoed command id.
        command: u8,
        /// Payload bytes the layout needs.
        expected: usize,
        /// Payload bytes present.
        actual: usize,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooShort { len } => write!(f, "too short ({} bytes)", len),
            Rejection::BadStart(b) => write!(f, "wrong prefix 0x{:02X}", b),
            Rejection::BadEnd(b) => write!(f, "wrong suffix 0x{:02X}", b),
            Rejection::BadMarker(b) => write!(f, "wrong reply marker 0x{:02X}", b),
            Rejection::NotSuccess(b) => write!(f, "not marked as success (0x{:02X})", b),
            Rejection::PayloadTooShort {
                command,
                expected,
                actual,
            } => write!(
                f,
                "payload for command 0x{:02X} too short: expected {} bytes, got {}",
                command, expected, actual
            ),
        }
    }
}

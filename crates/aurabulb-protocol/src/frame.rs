//! Frame encoding/decoding utilities.
//!
//! A request is built as an inner frame and then byte-stuffed for the wire:
//!
//! ```text
//! +-----+--------+--------+-----+-----------+--------+--------+-----+
//! | STX | len_lo | len_hi | cmd | payload.. | ck_lo  | ck_hi  | ETX |
//! +-----+--------+--------+-----+-----------+--------+--------+-----+
//! ```
//!
//! `len` counts `cmd` through `ck_hi`. `ck` is the 16-bit wrapping sum of
//! `len_lo` through the last payload byte. On the wire, every `0x01`, `0x02`
//! or `0x03` between STX and ETX is sent as `0x03, byte + 3`. The trailing ETX
//! is never escaped.

use bytes::{Buf, BufMut, BytesMut};

use crate::constants::*;
use crate::responses::Unstuffing;

/// Initial capacity of the reply buffer.
const READ_BUFFER_SIZE: usize = 256;

/// Sum every byte into a 16-bit accumulator, wrapping on overflow.
pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Build the unescaped inner frame for a command id and optional payload.
///
/// The length field is 16 bits wide; payloads longer than the bulb accepts
/// are not rejected here.
pub fn build_inner_frame(command: impl Into<u8>, payload: Option<&[u8]>) -> Vec<u8> {
    let payload = payload.unwrap_or(&[]);
    let frame_len = MIN_FRAME_LEN + payload.len();

    let mut buf = Vec::with_capacity(frame_len);
    buf.push(STX);
    buf.put_u16_le((frame_len - FRAME_OVERHEAD) as u16);
    buf.push(command.into());
    buf.extend_from_slice(payload);

    let sum = checksum(&buf[1..]);
    buf.put_u16_le(sum);
    buf.push(ETX);
    buf
}

/// Check whether a byte must be escaped on the wire.
pub fn is_reserved(byte: u8) -> bool {
    matches!(byte, STX | ETX | ESC)
}

/// Escape every reserved byte between the first and last byte of a frame.
pub fn stuff(frame: &[u8]) -> Vec<u8> {
    if frame.len() < 2 {
        return frame.to_vec();
    }
    let body = &frame[1..frame.len() - 1];
    let escaped = body.iter().filter(|&&b| is_reserved(b)).count();

    let mut out = Vec::with_capacity(frame.len() + escaped);
    out.push(frame[0]);
    for &b in body {
        if is_reserved(b) {
            out.push(ESC);
            out.push(b + ESC_OFFSET);
        } else {
            out.push(b);
        }
    }
    out.push(frame[frame.len() - 1]);
    out
}

/// Undo [`stuff`].
///
/// Malformed escape pairs (a trailing `ESC`, or an `ESC` followed by a byte
/// that is not an escaped reserved value) are copied through unchanged.
pub fn unstuff(frame: &[u8]) -> Vec<u8> {
    if frame.len() < 2 {
        return frame.to_vec();
    }
    let body = &frame[1..frame.len() - 1];

    let mut out = Vec::with_capacity(frame.len());
    out.push(frame[0]);
    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        if b == ESC {
            if let Some(&next) = body.get(i + 1) {
                if next >= ESC_OFFSET + STX && next <= ESC_OFFSET + ESC {
                    out.push(next - ESC_OFFSET);
                    i += 2;
                    continue;
                }
            }
        }
        out.push(b);
        i += 1;
    }
    out.push(frame[frame.len() - 1]);
    out
}

/// Accumulates bytes read from the link and splits them into reply frames.
///
/// Bytes before an STX are discarded as line noise. Where a frame ends
/// depends on how the bulb is assumed to escape its replies:
///
/// - [`Unstuffing::Legacy`]: replies arrive unescaped, so an `0x02` may sit
///   anywhere inside one. A frame is complete once the buffered input ends
///   in ETX and is at least a minimal reply long; everything buffered from
///   the STX is the frame.
/// - [`Unstuffing::Symmetric`]: replies are escaped like requests, so the
///   first ETX after the STX ends the frame and the rest stays buffered.
#[derive(Debug, Default)]
pub struct FrameReader {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    unstuffing: Unstuffing,
}

impl FrameReader {
    /// Create a new frame reader for unescaped replies.
    pub fn new() -> Self {
        FrameReader {
            buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            unstuffing: Unstuffing::default(),
        }
    }

    /// Set how reply boundaries are found.
    pub fn with_unstuffing(mut self, unstuffing: Unstuffing) -> Self {
        self.unstuffing = unstuffing;
        self
    }

    /// Get the unstuffing policy.
    pub fn unstuffing(&self) -> Unstuffing {
        self.unstuffing
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take a complete frame from the buffer.
    ///
    /// Returns `Some(frame)` including both markers, or `None` if more data
    /// is needed.
    pub fn decode(&mut self) -> Option<Vec<u8>> {
        let start = match self.buffer.iter().position(|&b| b == STX) {
            Some(start) => start,
            None => {
                self.buffer.clear();
                return None;
            }
        };
        self.buffer.advance(start);

        let end = match self.unstuffing {
            Unstuffing::Legacy => {
                let len = self.buffer.len();
                if len < MIN_RESPONSE_LEN || self.buffer[len - 1] != ETX {
                    return None;
                }
                len - 1
            }
            Unstuffing::Symmetric => self.buffer[1..].iter().position(|&b| b == ETX)? + 1,
        };
        Some(self.buffer.split_to(end + 1).to_vec())
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

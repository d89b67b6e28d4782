//! Hooks for watching frames go in and out of the codec.
//!
//! The codec never configures logging itself. Whoever builds a
//! [`ResponseDecoder`](crate::ResponseDecoder) passes in an observer, which
//! lets tests assert on rejected frames without touching global state.

use std::sync::Arc;

use log::{debug, warn};

use crate::commands::CommandId;
use crate::error::Rejection;
use crate::responses::Response;
use crate::types::hex_encode;

/// Receives notifications about frames handled by the codec.
///
/// All methods default to doing nothing.
pub trait FrameObserver {
    /// A request was encoded for transmission.
    fn frame_encoded(&self, _command: CommandId, _inner: &[u8], _wire: &[u8]) {}

    /// A reply frame failed validation or could not be decoded.
    fn frame_rejected(&self, _frame: &[u8], _rejection: &Rejection) {}

    /// A reply frame was decoded.
    fn response_decoded(&self, _response: &Response) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl FrameObserver for NullObserver {}

/// Observer that forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FrameObserver for LogObserver {
    fn frame_encoded(&self, command: CommandId, inner: &[u8], wire: &[u8]) {
        debug!(
            "{:?}: frame {} sent as {}",
            command,
            hex_encode(inner),
            hex_encode(wire)
        );
    }

    fn frame_rejected(&self, frame: &[u8], rejection: &Rejection) {
        warn!("rejected reply {}: {}", hex_encode(frame), rejection);
    }

    fn response_decoded(&self, response: &Response) {
        debug!("decoded {} reply: {:?}", response.kind(), response);
    }
}

impl<O: FrameObserver + ?Sized> FrameObserver for &O {
    fn frame_encoded(&self, command: CommandId, inner: &[u8], wire: &[u8]) {
        (**self).frame_encoded(command, inner, wire)
    }

    fn frame_rejected(&self, frame: &[u8], rejection: &Rejection) {
        (**self).frame_rejected(frame, rejection)
    }

    fn response_decoded(&self, response: &Response) {
        (**self).response_decoded(response)
    }
}

impl<O: FrameObserver + ?Sized> FrameObserver for Arc<O> {
    fn frame_encoded(&self, command: CommandId, inner: &[u8], wire: &[u8]) {
        (**self).frame_encoded(command, inner, wire)
    }

    fn frame_rejected(&self, frame: &[u8], rejection: &Rejection) {
        (**self).frame_rejected(frame, rejection)
    }

    fn response_decoded(&self, response: &Response) {
        (**self).response_decoded(response)
    }
}

impl<O: FrameObserver + ?Sized> FrameObserver for Box<O> {
    fn frame_encoded(&self, command: CommandId, inner: &[u8], wire: &[u8]) {
        (**self).frame_encoded(command, inner, wire)
    }

    fn frame_rejected(&self, frame: &[u8], rejection: &Rejection) {
        (**self).frame_rejected(frame, rejection)
    }

    fn response_decoded(&self, response: &Response) {
        (**self).response_decoded(response)
    }
}

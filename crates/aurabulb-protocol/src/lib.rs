//! AuraBulb Serial Protocol
//!
//! This crate provides the frame codec for talking to an AuraBulb smart
//! light bulb over its Bluetooth serial (RFCOMM) channel. The bulb accepts
//! fixed-structure binary requests and answers each one with a status frame.
//!
//! # Protocol Overview
//!
//! - **Requests** (host → bulb): `STX, len, cmd, payload, checksum, ETX`,
//!   with reserved bytes escaped on the wire
//! - **Replies** (bulb → host): `STX, ?, ?, 0x04, cmd, 0x55, payload, ETX`,
//!   where `0x55` marks success
//!
//! Replies that fail validation decode to `None`; the reason is handed to the
//! decoder's [`FrameObserver`].
//!
//! # Example
//!
//! ```rust
//! use aurabulb_protocol::{decode, Command, LightLevel, Response};
//!
//! let level = LightLevel::new(120).unwrap();
//! let wire = Command::SetLightLevel { level }.encode();
//! assert_eq!(wire[0], 0x01);
//!
//! let reply = [0x01, 0x00, 0x04, 0x04, 0x36, 0x55, 0x0c, 0x02];
//! assert_eq!(decode(&reply), Some(Response::Voltage { level: 12 }));
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod observer;
mod responses;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use observer::*;
pub use responses::*;
pub use types::*;

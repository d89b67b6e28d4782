//! AuraBulb Client
//!
//! Blocking client for an AuraBulb reachable over a byte-stream link, built
//! on the frame codec in `aurabulb-protocol`.
//!
//! - [`Transport`]: one request frame out, one reply frame back
//! - [`AuraBulb`]: the bulb's operations as typed methods
//! - [`WakeupRamp`]: brightens the bulb gradually between two times
//!
//! # Example
//!
//! ```rust,ignore
//! use aurabulb_client::{AuraBulb, StreamTransport};
//! use aurabulb_protocol::LightLevel;
//!
//! let mut transport = StreamTransport::open_device("/dev/rfcomm0")?;
//! transport.discard_greeting()?;
//!
//! let mut bulb = AuraBulb::new(transport);
//! bulb.set_light_level(LightLevel::new(120)?)?;
//! println!("voltage: {:?}", bulb.get_voltage()?);
//! ```

mod client;
mod error;
mod transport;
mod wakeup;

pub use client::*;
pub use error::*;
pub use transport::*;
pub use wakeup::*;

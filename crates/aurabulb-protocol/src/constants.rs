//! Protocol constants
//!
//! Frame markers, reply markers and the command id table understood by the
//! bulb firmware.

// ============================================================================
// Frame Markers
// ============================================================================

/// Start of frame.
pub const STX: u8 = 0x01;
/// End of frame.
pub const ETX: u8 = 0x02;
/// Escape byte introducing a two-byte escape pair.
pub const ESC: u8 = 0x03;
/// Added to a reserved byte to form the second byte of an escape pair.
pub const ESC_OFFSET: u8 = 3;

/// Size of an inner frame with an empty payload.
pub const MIN_FRAME_LEN: usize = 7;
/// Bytes not counted by the length field (STX, LEN_LO, LEN_HI, ETX).
pub const FRAME_OVERHEAD: usize = 4;

// ============================================================================
// Reply Markers
// ============================================================================

/// Byte 3 of every reply.
pub const RESPONSE_MARKER: u8 = 0x04;
/// Byte 5 of a reply to a command that succeeded.
pub const SUCCESS_SENTINEL: u8 = 0x55;
/// Shortest reply that can be checked at all.
pub const MIN_RESPONSE_LEN: usize = 6;

/// Offset of the marker byte in a reply.
pub const RESPONSE_MARKER_OFFSET: usize = 3;
/// Offset of the echoed command id in a reply.
pub const RESPONSE_COMMAND_OFFSET: usize = 4;
/// Offset of the status byte in a reply.
pub const RESPONSE_STATUS_OFFSET: usize = 5;
/// Offset of the first payload byte in a reply.
pub const RESPONSE_PAYLOAD_OFFSET: usize = 6;

// ============================================================================
// Command Codes (host → bulb)
// ============================================================================

/// Read the speaker volume.
pub const SPP_GET_VOL: u8 = 0x09;
/// Set the bulb's real-time clock.
pub const SPP_SET_SYSTEM_TIME: u8 = 0x18;
/// Read the current light level.
pub const SPP_LIGHT_CURRENT_LEVEL: u8 = 0x31;
/// Set the light level.
pub const SPP_LIGHT_ADJUST_LEVEL: u8 = 0x32;
/// Toggle the light on or off.
pub const SPP_LIGHT_TURN_ON_OFF: u8 = 0x33;
/// Read the battery voltage.
pub const SPP_GET_VOLTAGE: u8 = 0x36;
/// Read the alarm time and scene.
pub const SPP_GET_ALARM_TIME_SCENE: u8 = 0x42;
/// Set the alarm time and scene.
pub const SPP_SET_ALARM_TIME_SCENE: u8 = 0x43;
/// Set the light colour.
pub const SPP_COLOR_ADJUST: u8 = 0x44;
/// Set the light mode.
pub const SPP_LIGHT_SET_MODE: u8 = 0x45;
/// Read the light mode.
pub const SPP_LIGHT_GET_MODE: u8 = 0x46;
/// Read the light colour. Unreliable on the AuraBulb variant.
pub const SPP_LIGHT_GET_COLOR: u8 = 0x47;

// ============================================================================
// Argument Ranges
// ============================================================================

/// Brightest light level the bulb accepts.
pub const MAX_LIGHT_LEVEL: u8 = 210;
/// Lowest valid light mode.
pub const MIN_LIGHT_MODE: u8 = 1;
/// Highest valid light mode.
pub const MAX_LIGHT_MODE: u8 = 5;

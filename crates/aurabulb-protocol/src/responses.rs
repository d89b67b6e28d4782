//! Replies from the bulb.
//!
//! Every reply echoes the command id it answers:
//!
//! ```text
//! +-----+-----+-----+------+-----+------+-----------+-----+
//! | STX |  ?  |  ?  | 0x04 | cmd | 0x55 | payload.. | ETX |
//! +-----+-----+-----+------+-----+------+-----------+-----+
//! ```
//!
//! A reply that fails any structural check is treated as "no result": the
//! reason goes to the decoder's [`FrameObserver`] and nothing is returned.

use crate::commands::CommandId;
use crate::constants::*;
use crate::error::Rejection;
use crate::frame::unstuff;
use crate::observer::{FrameObserver, LogObserver};
use crate::types::AlarmSetting;

/// Payload bytes in an alarm reply: hour, minute, scene, enabled.
const ALARM_PAYLOAD_LEN: usize = 4;

/// A decoded reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Current light level.
    LightLevel {
        /// Level, `0..=MAX_LIGHT_LEVEL` on a healthy bulb.
        level: u8,
    },

    /// Battery voltage, in the bulb's own units.
    Voltage {
        /// Raw voltage reading.
        level: u8,
    },

    /// Alarm configuration.
    Alarm(AlarmSetting),

    /// Any reply without a structured layout.
    Raw {
        /// Echoed command id.
        command: u8,
        /// Bytes between the status byte and the terminator.
        data: Vec<u8>,
    },
}

impl Response {
    /// Short name of the reply kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Response::LightLevel { .. } => "lightlevel",
            Response::Voltage { .. } => "voltage",
            Response::Alarm(_) => "alarm",
            Response::Raw { .. } => "raw",
        }
    }
}

/// Whether replies are unescaped before they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unstuffing {
    /// Check the bytes exactly as received. The shipped firmware does not
    /// escape its replies, so reserved bytes may appear anywhere inside one.
    #[default]
    Legacy,
    /// Reverse the request escaping before checking.
    Symmetric,
}

/// Check the fixed markers of a reply frame.
///
/// Checks run in order and stop at the first failure.
pub fn check(frame: &[u8]) -> Result<(), Rejection> {
    if frame.len() < MIN_RESPONSE_LEN {
        return Err(Rejection::TooShort { len: frame.len() });
    }
    if frame[0] != STX {
        return Err(Rejection::BadStart(frame[0]));
    }
    let last = frame[frame.len() - 1];
    if last != ETX {
        return Err(Rejection::BadEnd(last));
    }
    if frame[RESPONSE_MARKER_OFFSET] != RESPONSE_MARKER {
        return Err(Rejection::BadMarker(frame[RESPONSE_MARKER_OFFSET]));
    }
    if frame[RESPONSE_STATUS_OFFSET] != SUCCESS_SENTINEL {
        return Err(Rejection::NotSuccess(frame[RESPONSE_STATUS_OFFSET]));
    }
    Ok(())
}

/// Check whether a reply frame reports success.
pub fn is_valid(frame: &[u8]) -> bool {
    check(frame).is_ok()
}

/// Decode a reply frame, logging rejections through the `log` facade.
pub fn decode(frame: &[u8]) -> Option<Response> {
    ResponseDecoder::new(LogObserver).decode(frame)
}

/// Decodes reply frames and reports what happened to an observer.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder<O = LogObserver> {
    observer: O,
    unstuffing: Unstuffing,
}

impl<O: FrameObserver> ResponseDecoder<O> {
    /// Create a decoder reporting to `observer`.
    pub fn new(observer: O) -> Self {
        ResponseDecoder {
            observer,
            unstuffing: Unstuffing::default(),
        }
    }

    /// Set the unstuffing policy.
    pub fn with_unstuffing(mut self, unstuffing: Unstuffing) -> Self {
        self.unstuffing = unstuffing;
        self
    }

    /// Get the unstuffing policy.
    pub fn unstuffing(&self) -> Unstuffing {
        self.unstuffing
    }

    /// Get the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Decode a reply frame.
    ///
    /// Returns `None` for any frame that fails [`check`] or is too short for
    /// the layout of its command.
    pub fn decode(&self, frame: &[u8]) -> Option<Response> {
        let unstuffed;
        let frame = match self.unstuffing {
            Unstuffing::Legacy => frame,
            Unstuffing::Symmetric => {
                unstuffed = unstuff(frame);
                &unstuffed[..]
            }
        };

        let result = check(frame).and_then(|()| decode_payload(frame));
        match result {
            Ok(response) => {
                self.observer.response_decoded(&response);
                Some(response)
            }
            Err(rejection) => {
                self.observer.frame_rejected(frame, &rejection);
                None
            }
        }
    }
}

/// Decode the payload of a frame that passed [`check`].
fn decode_payload(frame: &[u8]) -> Result<Response, Rejection> {
    let command = frame[RESPONSE_COMMAND_OFFSET];
    let payload = frame
        .get(RESPONSE_PAYLOAD_OFFSET..frame.len() - 1)
        .unwrap_or_default();

    let need = |expected: usize| {
        if payload.len() < expected {
            Err(Rejection::PayloadTooShort {
                command,
                expected,
                actual: payload.len(),
            })
        } else {
            Ok(())
        }
    };

    match CommandId::try_from(command).ok() {
        Some(CommandId::GetVoltage) => {
            need(1)?;
            Ok(Response::Voltage { level: payload[0] })
        }

        Some(CommandId::GetLightLevel) => {
            need(1)?;
            Ok(Response::LightLevel { level: payload[0] })
        }

        Some(CommandId::GetAlarm) => {
            need(ALARM_PAYLOAD_LEN)?;
            Ok(Response::Alarm(AlarmSetting {
                hour: payload[0],
                minute: payload[1],
                scene: payload[2],
                enabled: payload[3] != 0,
            }))
        }

        // Colour reads are unreliable on the AuraBulb, so they stay raw
        // along with every command that has no structured layout.
        _ => Ok(Response::Raw {
            command,
            data: payload.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        rejections: RefCell<Vec<Rejection>>,
        decoded: RefCell<Vec<Response>>,
    }

    impl FrameObserver for Recorder {
        fn frame_rejected(&self, _frame: &[u8], rejection: &Rejection) {
            self.rejections.borrow_mut().push(*rejection);
        }

        fn response_decoded(&self, response: &Response) {
            self.decoded.borrow_mut().push(response.clone());
        }
    }

    fn reply(command: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![
            STX,
            0x00,
            payload.len() as u8 + 3,
            RESPONSE_MARKER,
            command,
            SUCCESS_SENTINEL,
        ];
        frame.extend_from_slice(payload);
        frame.push(ETX);
        frame
    }

    #[test]
    fn test_check_accepts_minimal_reply() {
        let frame = reply(SPP_LIGHT_TURN_ON_OFF, &[]);
        assert_eq!(frame.len(), 7);
        assert_eq!(check(&frame), Ok(()));
        assert!(is_valid(&frame));
    }

    #[test]
    fn test_check_rejects_short_frames() {
        for len in 0..MIN_RESPONSE_LEN {
            let frame = vec![STX; len];
            assert_eq!(check(&frame), Err(Rejection::TooShort { len }));
            assert!(!is_valid(&frame));
        }
    }

    #[test]
    fn test_check_order_and_reasons() {
        let good = reply(SPP_GET_VOLTAGE, &[0x0c]);

        let mut bad = good.clone();
        bad[0] = 0x00;
        bad[5] = 0x00;
        assert_eq!(check(&bad), Err(Rejection::BadStart(0x00)));

        let mut bad = good.clone();
        *bad.last_mut().unwrap() = 0x03;
        assert_eq!(check(&bad), Err(Rejection::BadEnd(0x03)));

        let mut bad = good.clone();
        bad[3] = 0x05;
        assert_eq!(check(&bad), Err(Rejection::BadMarker(0x05)));

        let mut bad = good.clone();
        bad[5] = 0xaa;
        assert_eq!(check(&bad), Err(Rejection::NotSuccess(0xaa)));
    }

    #[test]
    fn test_six_byte_frame_can_never_be_valid() {
        // byte 5 would have to be both the sentinel and the terminator
        assert!(!is_valid(&[STX, 0, 0, RESPONSE_MARKER, 0x31, SUCCESS_SENTINEL]));
        assert!(!is_valid(&[STX, 0, 0, RESPONSE_MARKER, 0x31, ETX]));
    }

    #[test]
    fn test_decode_alarm() {
        let frame = [
            0x01, 0x00, 0x06, 0x04, SPP_GET_ALARM_TIME_SCENE, 0x55, 0x16, 0x1e, 0x01, 0x01, 0x02,
        ];
        assert_eq!(
            decode(&frame),
            Some(Response::Alarm(AlarmSetting {
                hour: 22,
                minute: 30,
                scene: 1,
                enabled: true,
            }))
        );
    }

    #[test]
    fn test_decode_alarm_disabled() {
        let frame = reply(SPP_GET_ALARM_TIME_SCENE, &[6, 15, 3, 0]);
        match decode(&frame) {
            Some(Response::Alarm(alarm)) => assert!(!alarm.enabled),
            other => panic!("expected alarm, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_voltage() {
        let response = decode(&reply(SPP_GET_VOLTAGE, &[0x0c]));
        assert_eq!(response, Some(Response::Voltage { level: 12 }));
        assert_eq!(response.map(|r| r.kind()), Some("voltage"));
    }

    #[test]
    fn test_decode_light_level() {
        assert_eq!(
            decode(&reply(SPP_LIGHT_CURRENT_LEVEL, &[0xd2])),
            Some(Response::LightLevel { level: 210 })
        );
    }

    #[test]
    fn test_decode_color_stays_raw() {
        assert_eq!(
            decode(&reply(SPP_LIGHT_GET_COLOR, &[0xff, 0x10, 0x20])),
            Some(Response::Raw {
                command: SPP_LIGHT_GET_COLOR,
                data: vec![0xff, 0x10, 0x20],
            })
        );
    }

    #[test]
    fn test_decode_unknown_command_is_raw() {
        assert_eq!(
            decode(&reply(0xee, &[0x01])),
            Some(Response::Raw {
                command: 0xee,
                data: vec![0x01],
            })
        );
        assert_eq!(
            decode(&reply(SPP_LIGHT_TURN_ON_OFF, &[])),
            Some(Response::Raw {
                command: SPP_LIGHT_TURN_ON_OFF,
                data: vec![],
            })
        );
    }

    #[test]
    fn test_decode_fails_closed() {
        let good = reply(SPP_GET_VOLTAGE, &[0x0c]);
        let mut cases = vec![good[..5].to_vec()];
        for (index, value) in [(0usize, 0x00u8), (good.len() - 1, 0x00), (3, 0x00), (5, 0x54)] {
            let mut bad = good.clone();
            bad[index] = value;
            cases.push(bad);
        }
        for frame in cases {
            assert_eq!(decode(&frame), None, "frame {:02x?}", frame);
        }
    }

    #[test]
    fn test_decoder_reports_rejections() {
        let decoder = ResponseDecoder::new(Recorder::default());
        assert_eq!(decoder.decode(&[0x01, 0x02]), None);
        assert_eq!(
            decoder.decode(&reply(SPP_GET_ALARM_TIME_SCENE, &[22, 30])),
            None
        );
        assert!(decoder.decode(&reply(SPP_GET_VOLTAGE, &[7])).is_some());

        let recorder = decoder.observer();
        assert_eq!(
            *recorder.rejections.borrow(),
            vec![
                Rejection::TooShort { len: 2 },
                Rejection::PayloadTooShort {
                    command: SPP_GET_ALARM_TIME_SCENE,
                    expected: 4,
                    actual: 2,
                },
            ]
        );
        assert_eq!(*recorder.decoded.borrow(), vec![Response::Voltage { level: 7 }]);
    }

    #[test]
    fn test_symmetric_unstuffing() {
        // light level 2 arrives escaped as 03 05
        let wire = [
            0x01,
            0x00,
            0x05,
            0x04,
            SPP_LIGHT_CURRENT_LEVEL,
            0x55,
            0x03,
            0x05,
            0x02,
        ];

        let legacy = ResponseDecoder::new(Recorder::default());
        assert_eq!(legacy.decode(&wire), Some(Response::LightLevel { level: 3 }));

        let symmetric =
            ResponseDecoder::new(Recorder::default()).with_unstuffing(Unstuffing::Symmetric);
        assert_eq!(symmetric.unstuffing(), Unstuffing::Symmetric);
        assert_eq!(symmetric.decode(&wire), Some(Response::LightLevel { level: 2 }));
    }
}

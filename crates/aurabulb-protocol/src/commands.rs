//! Commands that can be sent to the bulb.

use crate::constants::*;
use crate::error::*;
use crate::frame::{build_inner_frame, stuff};
use crate::types::*;

/// Command ids understood by the bulb firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    /// Read the speaker volume.
    GetVolume = SPP_GET_VOL,
    /// Set the real-time clock.
    SetSystemTime = SPP_SET_SYSTEM_TIME,
    /// Read the light level.
    GetLightLevel = SPP_LIGHT_CURRENT_LEVEL,
    /// Set the light level.
    SetLightLevel = SPP_LIGHT_ADJUST_LEVEL,
    /// Toggle the light.
    ToggleLight = SPP_LIGHT_TURN_ON_OFF,
    /// Read the battery voltage.
    GetVoltage = SPP_GET_VOLTAGE,
    /// Read the alarm.
    GetAlarm = SPP_GET_ALARM_TIME_SCENE,
    /// Set the alarm.
    SetAlarm = SPP_SET_ALARM_TIME_SCENE,
    /// Set the colour.
    SetColor = SPP_COLOR_ADJUST,
    /// Set the light mode.
    SetLightMode = SPP_LIGHT_SET_MODE,
    /// Read the light mode.
    GetLightMode = SPP_LIGHT_GET_MODE,
    /// Read the colour.
    GetColor = SPP_LIGHT_GET_COLOR,
}

impl CommandId {
    /// Every command id, in code order.
    pub const ALL: [CommandId; 12] = [
        CommandId::GetVolume,
        CommandId::SetSystemTime,
        CommandId::GetLightLevel,
        CommandId::SetLightLevel,
        CommandId::ToggleLight,
        CommandId::GetVoltage,
        CommandId::GetAlarm,
        CommandId::SetAlarm,
        CommandId::SetColor,
        CommandId::SetLightMode,
        CommandId::GetLightMode,
        CommandId::GetColor,
    ];

    /// Get the wire code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.code() == code)
            .ok_or(ProtocolError::UnknownCommand(code))
    }
}

impl From<CommandId> for u8 {
    fn from(id: CommandId) -> Self {
        id.code()
    }
}

/// Commands that can be sent to the bulb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the light off, or back to its last level.
    ToggleLight,

    /// Read the light level.
    GetLightLevel,

    /// Set the light level.
    SetLightLevel {
        /// New level.
        level: LightLevel,
    },

    /// Read the colour.
    GetColor,

    /// Set the colour.
    SetColor {
        /// New colour.
        color: Rgb,
    },

    /// Read the light mode.
    GetLightMode,

    /// Set the light mode.
    SetLightMode {
        /// New mode.
        mode: LightMode,
    },

    /// Read the battery voltage.
    GetVoltage,

    /// Read the speaker volume.
    GetVolume,

    /// Set the real-time clock.
    SetSystemTime {
        /// Wall clock time.
        time: SystemTime,
    },

    /// Set the alarm.
    SetAlarm {
        /// Time of day.
        time: AlarmTime,
        /// Scene played when the alarm fires.
        scene: u8,
        /// Whether the alarm is armed.
        enabled: bool,
    },

    /// Read the alarm.
    GetAlarm,
}

impl Command {
    /// Get the command id for this command.
    pub fn id(&self) -> CommandId {
        match self {
            Command::ToggleLight => CommandId::ToggleLight,
            Command::GetLightLevel => CommandId::GetLightLevel,
            Command::SetLightLevel { .. } => CommandId::SetLightLevel,
            Command::GetColor => CommandId::GetColor,
            Command::SetColor { .. } => CommandId::SetColor,
            Command::GetLightMode => CommandId::GetLightMode,
            Command::SetLightMode { .. } => CommandId::SetLightMode,
            Command::GetVoltage => CommandId::GetVoltage,
            Command::GetVolume => CommandId::GetVolume,
            Command::SetSystemTime { .. } => CommandId::SetSystemTime,
            Command::SetAlarm { .. } => CommandId::SetAlarm,
            Command::GetAlarm => CommandId::GetAlarm,
        }
    }

    /// Get the command code for this command.
    pub fn code(&self) -> u8 {
        self.id().code()
    }

    /// Encode the command arguments. Empty for commands without arguments.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Command::ToggleLight
            | Command::GetLightLevel
            | Command::GetColor
            | Command::GetLightMode
            | Command::GetVoltage
            | Command::GetVolume
            | Command::GetAlarm => Vec::new(),

            Command::SetLightLevel { level } => vec![level.get()],

            Command::SetColor { color } => color.to_bytes().to_vec(),

            Command::SetLightMode { mode } => vec![mode.get()],

            Command::SetSystemTime { time } => time.to_bytes().to_vec(),

            Command::SetAlarm {
                time,
                scene,
                enabled,
            } => vec![time.hour(), time.minute(), *scene, u8::from(*enabled)],
        }
    }

    /// Build the unescaped inner frame.
    pub fn inner_frame(&self) -> Vec<u8> {
        let payload = self.payload();
        if payload.is_empty() {
            build_inner_frame(self.id(), None)
        } else {
            build_inner_frame(self.id(), Some(&payload))
        }
    }

    /// Encode the command to the bytes sent on the wire.
    pub fn encode(&self) -> Vec<u8> {
        stuff(&self.inner_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_command_id_round_trip() {
        for id in CommandId::ALL {
            assert_eq!(CommandId::try_from(id.code()), Ok(id));
        }
        assert_eq!(
            CommandId::try_from(0x00),
            Err(ProtocolError::UnknownCommand(0x00))
        );
    }

    #[test]
    fn test_toggle_light_encoding() {
        let cmd = Command::ToggleLight;
        assert_eq!(cmd.inner_frame(), vec![0x01, 0x03, 0x00, 0x33, 0x36, 0x00, 0x02]);
        // the length field of an empty payload is itself a reserved byte
        assert_eq!(
            cmd.encode(),
            vec![0x01, 0x03, 0x06, 0x00, 0x33, 0x36, 0x00, 0x02]
        );
    }

    #[test]
    fn test_set_light_level_encoding() {
        let cmd = Command::SetLightLevel {
            level: LightLevel::new(0xd0).unwrap(),
        };
        assert_eq!(cmd.payload(), vec![0xd0]);
        // 04 + 00 + 32 + d0 = 0x0106, low byte needs no escape, high byte does
        assert_eq!(
            cmd.encode(),
            vec![0x01, 0x04, 0x00, 0x32, 0xd0, 0x06, 0x03, 0x04, 0x02]
        );
    }

    #[test]
    fn test_set_color_payload() {
        let cmd = Command::SetColor {
            color: Rgb::new(255, 0, 0),
        };
        assert_eq!(cmd.payload(), vec![0xff, 0x00, 0x00]);
        assert_eq!(cmd.inner_frame().len(), 10);
    }

    #[test]
    fn test_set_alarm_payload() {
        let cmd = Command::SetAlarm {
            time: AlarmTime::new(22, 4).unwrap(),
            scene: 0,
            enabled: true,
        };
        assert_eq!(cmd.payload(), vec![22, 4, 0, 1]);

        let disabled = Command::SetAlarm {
            time: AlarmTime::new(6, 30).unwrap(),
            scene: 2,
            enabled: false,
        };
        assert_eq!(disabled.payload(), vec![6, 30, 2, 0]);
    }

    #[test]
    fn test_set_system_time_payload() {
        let dt = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let cmd = Command::SetSystemTime {
            time: SystemTime::from_naive_datetime(dt).unwrap(),
        };
        assert_eq!(cmd.payload(), vec![26, 20, 10, 19, 8, 0, 0, 0]);
        assert_eq!(cmd.inner_frame().len(), 15);
        assert_eq!(cmd.code(), SPP_SET_SYSTEM_TIME);
    }

    #[test]
    fn test_commands_without_arguments_use_minimal_frame() {
        for cmd in [
            Command::ToggleLight,
            Command::GetLightLevel,
            Command::GetColor,
            Command::GetLightMode,
            Command::GetVoltage,
            Command::GetVolume,
            Command::GetAlarm,
        ] {
            assert_eq!(cmd.inner_frame().len(), MIN_FRAME_LEN);
        }
    }
}

//! Command: one decoded remote instruction with an optional typed argument.
//!
//! Commands are produced by the (external) wire decoder and handed to the
//! engine. The engine only ever rewrites the [`StreamCursor`] of a
//! streaming command; everything else is read-only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::KnxAddress;
use crate::alarm::AlarmThresholds;

macro_rules! define_command_types {
    ($($(#[doc = $doc:expr])* $variant:ident => $wire:literal,)*) => {
        /// The type tag of a [`Command`]; maps 1:1 to a handler.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "&'static str")]
        pub enum CommandType {
            $($(#[doc = $doc])* $variant,)*
            /// Any tag the decoder could not map to a known command.
            Unknown,
        }

        impl CommandType {
            /// Every known command type, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The upper-case wire name (e.g. `"STATIC_IP"`).
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                    Self::Unknown => "UNKNOWN",
                }
            }

            /// Map a wire name to a command type, falling back to
            /// [`CommandType::Unknown`].
            #[must_use]
            pub fn from_wire(name: &str) -> Self {
                match name {
                    $($wire => Self::$variant,)*
                    _ => Self::Unknown,
                }
            }
        }
    };
}

define_command_types! {
    /// Trigger an immediate data exchange.
    Now => "NOW",
    /// Reset the node.
    Reload => "RELOAD",
    /// Telemetry interval.
    Heartbeat => "HEARTBEAT",
    /// Real-time clock.
    Rtc => "RTC",
    Status => "STATUS",
    Version => "VERSION",
    /// Write-once device identifier.
    Id => "ID",
    /// Write-once preshared key.
    Signature => "SIGNATURE",
    Movement => "MOVEMENT",
    Atmo => "ATMO",
    /// Stream the system log.
    System => "SYSTEM",
    /// Stream the sensor-reading log.
    Readings => "READINGS",
    Alarm => "ALARM",
    Mac => "MAC",
    Url => "URL",
    Port => "PORT",
    Ssid => "SSID",
    Pass => "PASS",
    Auth => "AUTH",
    StaticIp => "STATIC_IP",
    StaticMask => "STATIC_MASK",
    StaticGateway => "STATIC_GATEWAY",
    StaticDns => "STATIC_DNS",
    /// Drive or query actuators.
    Set => "SET",
    KnxPhysicalAddress => "KNX_PHYSICAL_ADDRESS",
    KnxGroupAddress => "KNX_GROUP_ADDRESS",
    KnxMulticastAddress => "KNX_MULTICAST_ADDRESS",
    KnxMulticastPort => "KNX_MULTICAST_PORT",
    KnxNat => "KNX_NAT",
    Location => "LOCATION",
    Ssl => "SSL",
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CommandType {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<CommandType> for &'static str {
    fn from(value: CommandType) -> Self {
        value.as_str()
    }
}

/// Identifier of an actuator attached to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorId(pub u8);

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Target value for a single actuator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorTarget {
    pub id: ActuatorId,
    pub value: String,
}

/// Resumable position in a streamed record buffer.
///
/// The caller keeps this between calls and resubmits it; the engine writes
/// the advanced offset back into the command after each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamCursor {
    /// Clear the backing buffer and restart from the beginning.
    pub reset: bool,
    /// Index of the next record to send.
    pub offset: usize,
}

impl StreamCursor {
    #[must_use]
    pub fn at(offset: usize) -> Self {
        Self {
            reset: false,
            offset,
        }
    }

    #[must_use]
    pub fn reset() -> Self {
        Self {
            reset: true,
            offset: 0,
        }
    }
}

/// Typed command argument. The active variant depends on the command type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Argument {
    Unsigned(u32),
    Flag(bool),
    Text(String),
    Address(KnxAddress),
    Actuator(ActuatorTarget),
    Alarms(AlarmThresholds),
    Cursor(StreamCursor),
}

impl Argument {
    /// The variant tag, used in validation errors.
    #[must_use]
    pub fn kind(&self) -> ArgumentKind {
        match self {
            Self::Unsigned(_) => ArgumentKind::Unsigned,
            Self::Flag(_) => ArgumentKind::Flag,
            Self::Text(_) => ArgumentKind::Text,
            Self::Address(_) => ArgumentKind::Address,
            Self::Actuator(_) => ArgumentKind::Actuator,
            Self::Alarms(_) => ArgumentKind::Alarms,
            Self::Cursor(_) => ArgumentKind::Cursor,
        }
    }
}

/// Discriminant of [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Unsigned,
    Flag,
    Text,
    Address,
    Actuator,
    Alarms,
    Cursor,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unsigned => "unsigned",
            Self::Flag => "flag",
            Self::Text => "text",
            Self::Address => "address",
            Self::Actuator => "actuator",
            Self::Alarms => "alarms",
            Self::Cursor => "cursor",
        })
    }
}

/// A decoded remote command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "command")]
    pub command_type: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<Argument>,
}

impl Command {
    /// A query: the command carries no argument.
    #[must_use]
    pub fn get(command_type: CommandType) -> Self {
        Self {
            command_type,
            argument: None,
        }
    }

    /// A mutation: the command carries `argument`.
    #[must_use]
    pub fn set(command_type: CommandType, argument: Argument) -> Self {
        Self {
            command_type,
            argument: Some(argument),
        }
    }

    #[must_use]
    pub fn has_argument(&self) -> bool {
        self.argument.is_some()
    }

    /// The streaming cursor carried by this command, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<StreamCursor> {
        match self.argument {
            Some(Argument::Cursor(cursor)) => Some(cursor),
            _ => None,
        }
    }
}

/// Outcome of executing one command.
///
/// There is no failure variant: a rejected command still executes
/// completely, with a bad-request marker as its response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionResult {
    ExecutedCompletely,
    /// More data remains; resend the command with the returned cursor.
    ExecutedPartially,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_every_wire_name() {
        for command_type in CommandType::ALL {
            assert_eq!(CommandType::from_wire(command_type.as_str()), *command_type);
        }
    }

    #[test]
    fn should_map_unrecognised_name_to_unknown() {
        assert_eq!(CommandType::from_wire("REBOOT"), CommandType::Unknown);
        assert_eq!(CommandType::from_wire("now"), CommandType::Unknown);
    }

    #[test]
    fn should_list_thirty_one_known_commands() {
        assert_eq!(CommandType::ALL.len(), 31);
        assert!(!CommandType::ALL.contains(&CommandType::Unknown));
    }

    #[test]
    fn should_deserialize_command_from_json() {
        let json = serde_json::json!({
            "command": "HEARTBEAT",
            "argument": {"type": "unsigned", "value": 60}
        });
        let command: Command = serde_json::from_value(json).unwrap();
        assert_eq!(command.command_type, CommandType::Heartbeat);
        assert_eq!(command.argument, Some(Argument::Unsigned(60)));
    }

    #[test]
    fn should_deserialize_unknown_command_from_json() {
        let json = serde_json::json!({"command": "SELF_DESTRUCT"});
        let command: Command = serde_json::from_value(json).unwrap();
        assert_eq!(command.command_type, CommandType::Unknown);
        assert!(!command.has_argument());
    }

    #[test]
    fn should_deserialize_cursor_with_defaults() {
        let json = serde_json::json!({
            "command": "READINGS",
            "argument": {"type": "cursor", "value": {"offset": 12}}
        });
        let command: Command = serde_json::from_value(json).unwrap();
        assert_eq!(command.cursor(), Some(StreamCursor::at(12)));
    }

    #[test]
    fn should_report_argument_kind() {
        assert_eq!(Argument::Flag(true).kind(), ArgumentKind::Flag);
        assert_eq!(
            Argument::Cursor(StreamCursor::reset()).kind(),
            ArgumentKind::Cursor
        );
    }
}

//! Response items: the semantic values handlers append to a response.
//!
//! The wire encoding of these items is owned by the response writer
//! implementation, not by the engine.

use serde::{Deserialize, Serialize};

use crate::address::{KnxAddress, MacAddress};
use crate::alarm::AlarmThresholds;
use crate::command::CommandType;
use crate::record::{SensorReading, SystemLogEntry};

/// One value appended to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseItem {
    /// Acknowledgement for commands without a value.
    Done,
    /// The command was rejected; nothing was changed.
    BadRequest,
    Number {
        command: CommandType,
        value: u32,
    },
    Text {
        command: CommandType,
        value: String,
    },
    /// Enabled/disabled state of a boolean parameter.
    Status {
        command: CommandType,
        enabled: bool,
    },
    KnxAddress {
        command: CommandType,
        address: KnxAddress,
    },
    Mac {
        address: MacAddress,
    },
    Alarms {
        thresholds: AlarmThresholds,
    },
    SystemEntry(SystemLogEntry),
    Reading(SensorReading),
}

impl ResponseItem {
    #[must_use]
    pub fn number(command: CommandType, value: impl Into<u32>) -> Self {
        Self::Number {
            command,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn text(command: CommandType, value: impl Into<String>) -> Self {
        Self::Text {
            command,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn status(command: CommandType, enabled: bool) -> Self {
        Self::Status { command, enabled }
    }
}

impl From<SystemLogEntry> for ResponseItem {
    fn from(entry: SystemLogEntry) -> Self {
        Self::SystemEntry(entry)
    }
}

impl From<SensorReading> for ResponseItem {
    fn from(reading: SensorReading) -> Self {
        Self::Reading(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_number_with_wire_name() {
        let item = ResponseItem::number(CommandType::Heartbeat, 60u32);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "number", "command": "HEARTBEAT", "value": 60})
        );
    }

    #[test]
    fn should_serialize_reading_inline() {
        let item = ResponseItem::Reading(SensorReading {
            timestamp: 10,
            values: [1, 2, 3, 4],
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "reading");
        assert_eq!(json["timestamp"], 10);
    }

    #[test]
    fn should_serialize_bad_request_as_bare_kind() {
        let json = serde_json::to_value(ResponseItem::BadRequest).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "bad_request"}));
    }
}

//! Device: fixed facts about the node that commands report but never change.

use serde::{Deserialize, Serialize};

use crate::address::MacAddress;
use crate::command::ActuatorId;
use crate::version::FirmwareVersion;

/// Maximum length of the application status text returned by `STATUS`.
pub const STATUS_MAX_LEN: usize = 128;

/// Read-only identity of the node hardware and firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub firmware: FirmwareVersion,
    /// MAC address of the WiFi module.
    pub mac: MacAddress,
    /// Actuators attached to the node, in the order `SET` queries them.
    pub actuators: Vec<ActuatorId>,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            firmware: FirmwareVersion::new(1, 0, 0),
            mac: MacAddress::default(),
            actuators: Vec::new(),
        }
    }
}

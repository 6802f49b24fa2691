//! Device configuration: the single owned aggregate of every parameter the
//! backend can read or change.
//!
//! Each persisted parameter has a [`ConfigKey`]. The engine writes the new
//! value under that key every time it accepts a mutation; at boot the
//! aggregate is rebuilt from the stored values with [`DeviceConfig::apply`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::address::KnxAddress;
use crate::alarm::AlarmThresholds;

/// Persistence key of a configuration parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    SystemHeartbeat,
    DeviceId,
    DevicePresharedKey,
    Movement,
    Atmo,
    ServerIp,
    ServerPort,
    WifiSsid,
    WifiPass,
    WifiAuth,
    WifiStaticIp,
    WifiStaticMask,
    WifiStaticGateway,
    WifiStaticDns,
    KnxPhysicalAddress,
    KnxGroupAddress,
    KnxMulticastAddress,
    KnxMulticastPort,
    KnxNat,
    Location,
    Ssl,
}

impl ConfigKey {
    pub const ALL: [Self; 21] = [
        Self::SystemHeartbeat,
        Self::DeviceId,
        Self::DevicePresharedKey,
        Self::Movement,
        Self::Atmo,
        Self::ServerIp,
        Self::ServerPort,
        Self::WifiSsid,
        Self::WifiPass,
        Self::WifiAuth,
        Self::WifiStaticIp,
        Self::WifiStaticMask,
        Self::WifiStaticGateway,
        Self::WifiStaticDns,
        Self::KnxPhysicalAddress,
        Self::KnxGroupAddress,
        Self::KnxMulticastAddress,
        Self::KnxMulticastPort,
        Self::KnxNat,
        Self::Location,
        Self::Ssl,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemHeartbeat => "system_heartbeat",
            Self::DeviceId => "device_id",
            Self::DevicePresharedKey => "device_preshared_key",
            Self::Movement => "movement",
            Self::Atmo => "atmo",
            Self::ServerIp => "server_ip",
            Self::ServerPort => "server_port",
            Self::WifiSsid => "wifi_ssid",
            Self::WifiPass => "wifi_pass",
            Self::WifiAuth => "wifi_auth",
            Self::WifiStaticIp => "wifi_static_ip",
            Self::WifiStaticMask => "wifi_static_mask",
            Self::WifiStaticGateway => "wifi_static_gateway",
            Self::WifiStaticDns => "wifi_static_dns",
            Self::KnxPhysicalAddress => "knx_physical_address",
            Self::KnxGroupAddress => "knx_group_address",
            Self::KnxMulticastAddress => "knx_multicast_address",
            Self::KnxMulticastPort => "knx_multicast_port",
            Self::KnxNat => "knx_nat",
            Self::Location => "location",
            Self::Ssl => "ssl",
        }
    }

    /// Maximum byte length for text parameters; `None` for fixed-size ones.
    #[must_use]
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::DeviceId | Self::DevicePresharedKey | Self::WifiSsid => Some(32),
            Self::ServerIp | Self::WifiPass => Some(64),
            Self::WifiStaticIp
            | Self::WifiStaticMask
            | Self::WifiStaticGateway
            | Self::WifiStaticDns
            | Self::KnxMulticastAddress => Some(16),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw parameter value as handed to the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    U32(u32),
    U16(u16),
    U8(u8),
    Bool(bool),
    Text(String),
    Address(KnxAddress),
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u16> for ConfigValue {
    fn from(value: u16) -> Self {
        Self::U16(value)
    }
}

impl From<u8> for ConfigValue {
    fn from(value: u8) -> Self {
        Self::U8(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<KnxAddress> for ConfigValue {
    fn from(value: KnxAddress) -> Self {
        Self::Address(value)
    }
}

/// A stored value whose type does not match its key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored value for {key} has the wrong type")]
pub struct ValueTypeMismatch {
    pub key: ConfigKey,
}

/// Movement-detection flag shared with the sensor interrupt context.
///
/// Clones share the same underlying flag. Reads and writes are single
/// atomic operations, so the interrupt side never observes a torn value.
#[derive(Debug, Clone, Default)]
pub struct MovementFlag(Arc<AtomicBool>);

impl MovementFlag {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }
}

/// Every configurable parameter of the node.
#[derive(Debug)]
pub struct DeviceConfig {
    /// Telemetry interval, in seconds.
    pub heartbeat: u32,
    pub device_id: String,
    pub preshared_key: String,
    pub movement: MovementFlag,
    pub atmo: bool,
    pub server_url: String,
    pub server_port: u16,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub wifi_auth: u8,
    pub static_ip: String,
    pub static_mask: String,
    pub static_gateway: String,
    pub static_dns: String,
    pub knx_physical_address: KnxAddress,
    pub knx_group_address: KnxAddress,
    pub multicast_address: String,
    pub multicast_port: u16,
    pub knx_nat: bool,
    pub location: bool,
    pub ssl: bool,
    /// Runtime-only; never persisted.
    pub alarms: AlarmThresholds,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            heartbeat: 300,
            device_id: String::new(),
            preshared_key: String::new(),
            movement: MovementFlag::new(false),
            atmo: true,
            server_url: String::new(),
            server_port: 1883,
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            wifi_auth: 0,
            static_ip: String::new(),
            static_mask: String::new(),
            static_gateway: String::new(),
            static_dns: String::new(),
            knx_physical_address: KnxAddress::default(),
            knx_group_address: KnxAddress::default(),
            multicast_address: "224.0.23.12".to_string(),
            multicast_port: 3671,
            knx_nat: false,
            location: false,
            ssl: false,
            alarms: AlarmThresholds::default(),
        }
    }
}

impl DeviceConfig {
    /// Current value of the parameter stored under `key`.
    #[must_use]
    pub fn value(&self, key: ConfigKey) -> ConfigValue {
        match key {
            ConfigKey::SystemHeartbeat => self.heartbeat.into(),
            ConfigKey::DeviceId => self.device_id.as_str().into(),
            ConfigKey::DevicePresharedKey => self.preshared_key.as_str().into(),
            ConfigKey::Movement => self.movement.get().into(),
            ConfigKey::Atmo => self.atmo.into(),
            ConfigKey::ServerIp => self.server_url.as_str().into(),
            ConfigKey::ServerPort => self.server_port.into(),
            ConfigKey::WifiSsid => self.wifi_ssid.as_str().into(),
            ConfigKey::WifiPass => self.wifi_password.as_str().into(),
            ConfigKey::WifiAuth => self.wifi_auth.into(),
            ConfigKey::WifiStaticIp => self.static_ip.as_str().into(),
            ConfigKey::WifiStaticMask => self.static_mask.as_str().into(),
            ConfigKey::WifiStaticGateway => self.static_gateway.as_str().into(),
            ConfigKey::WifiStaticDns => self.static_dns.as_str().into(),
            ConfigKey::KnxPhysicalAddress => self.knx_physical_address.into(),
            ConfigKey::KnxGroupAddress => self.knx_group_address.into(),
            ConfigKey::KnxMulticastAddress => self.multicast_address.as_str().into(),
            ConfigKey::KnxMulticastPort => self.multicast_port.into(),
            ConfigKey::KnxNat => self.knx_nat.into(),
            ConfigKey::Location => self.location.into(),
            ConfigKey::Ssl => self.ssl.into(),
        }
    }

    /// Overwrite the parameter stored under `key` with a previously
    /// persisted value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueTypeMismatch`] if `value` has the wrong type for `key`;
    /// the configuration is left unchanged.
    pub fn apply(&mut self, key: ConfigKey, value: ConfigValue) -> Result<(), ValueTypeMismatch> {
        let mismatch = ValueTypeMismatch { key };
        match (key, value) {
            (ConfigKey::SystemHeartbeat, ConfigValue::U32(v)) => self.heartbeat = v,
            (ConfigKey::DeviceId, ConfigValue::Text(v)) => self.device_id = v,
            (ConfigKey::DevicePresharedKey, ConfigValue::Text(v)) => self.preshared_key = v,
            (ConfigKey::Movement, ConfigValue::Bool(v)) => self.movement.set(v),
            (ConfigKey::Atmo, ConfigValue::Bool(v)) => self.atmo = v,
            (ConfigKey::ServerIp, ConfigValue::Text(v)) => self.server_url = v,
            (ConfigKey::ServerPort, ConfigValue::U16(v)) => self.server_port = v,
            (ConfigKey::WifiSsid, ConfigValue::Text(v)) => self.wifi_ssid = v,
            (ConfigKey::WifiPass, ConfigValue::Text(v)) => self.wifi_password = v,
            (ConfigKey::WifiAuth, ConfigValue::U8(v)) => self.wifi_auth = v,
            (ConfigKey::WifiStaticIp, ConfigValue::Text(v)) => self.static_ip = v,
            (ConfigKey::WifiStaticMask, ConfigValue::Text(v)) => self.static_mask = v,
            (ConfigKey::WifiStaticGateway, ConfigValue::Text(v)) => self.static_gateway = v,
            (ConfigKey::WifiStaticDns, ConfigValue::Text(v)) => self.static_dns = v,
            (ConfigKey::KnxPhysicalAddress, ConfigValue::Address(v)) => {
                self.knx_physical_address = v;
            }
            (ConfigKey::KnxGroupAddress, ConfigValue::Address(v)) => self.knx_group_address = v,
            (ConfigKey::KnxMulticastAddress, ConfigValue::Text(v)) => self.multicast_address = v,
            (ConfigKey::KnxMulticastPort, ConfigValue::U16(v)) => self.multicast_port = v,
            (ConfigKey::KnxNat, ConfigValue::Bool(v)) => self.knx_nat = v,
            (ConfigKey::Location, ConfigValue::Bool(v)) => self.location = v,
            (ConfigKey::Ssl, ConfigValue::Bool(v)) => self.ssl = v,
            _ => return Err(mismatch),
        }
        Ok(())
    }
}

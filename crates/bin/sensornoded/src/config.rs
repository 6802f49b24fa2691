//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `sensornode.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

use sensornode_domain::address::MacAddress;
use sensornode_domain::command::ActuatorId;
use sensornode_domain::device::DeviceInfo;
use sensornode_domain::version::FirmwareVersion;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    /// Where configuration parameters are persisted.
    pub storage: StorageConfig,
    pub response: ResponseConfig,
    /// Record buffer sizes.
    pub buffers: BuffersConfig,
    /// Fixed hardware identity.
    pub device: DeviceConfig,
    /// Simulated network behaviour.
    pub network: NetworkConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding persisted parameters. `None` keeps them in memory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Maximum number of items in one response.
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuffersConfig {
    pub system_capacity: usize,
    pub readings_capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// MAC address, colon-separated hex.
    pub mac: String,
    /// Actuator ids, in the order their state is reported.
    pub actuators: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Polls a teardown reports in progress before completing.
    pub teardown_steps: usize,
    /// Whether static addressing starts out as the active mode.
    pub static_ip: bool,
}

impl Config {
    /// Load configuration from `sensornode.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sensornode.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SENSORNODE_STORE") {
            self.storage.path = (!val.is_empty()).then(|| PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SENSORNODE_RESPONSE_CAPACITY")
            && let Ok(capacity) = val.parse()
        {
            self.response.capacity = capacity;
        }
        if let Ok(val) = std::env::var("SENSORNODE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.response.capacity == 0 {
            return Err(ConfigError::Validation(
                "response capacity must be non-zero".to_string(),
            ));
        }
        self.mac()?;
        Ok(())
    }

    fn mac(&self) -> Result<MacAddress, ConfigError> {
        self.device
            .mac
            .parse()
            .map_err(|_| ConfigError::Validation(format!("invalid MAC address {:?}", self.device.mac)))
    }

    /// Hardware identity reported by `VERSION`, `MAC` and `SET`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured MAC address is malformed.
    pub fn device_info(&self) -> Result<DeviceInfo, ConfigError> {
        Ok(DeviceInfo {
            firmware: firmware_version(),
            mac: self.mac()?,
            actuators: self.actuator_ids(),
        })
    }

    #[must_use]
    pub fn actuator_ids(&self) -> Vec<ActuatorId> {
        self.device.actuators.iter().copied().map(ActuatorId).collect()
    }
}

/// The firmware version is the daemon's own package version.
fn firmware_version() -> FirmwareVersion {
    let part = |value: &str| value.parse::<u8>().unwrap_or(0);
    FirmwareVersion::new(
        part(env!("CARGO_PKG_VERSION_MAJOR")),
        part(env!("CARGO_PKG_VERSION_MINOR")),
        part(env!("CARGO_PKG_VERSION_PATCH")),
    )
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sensornoded=info,sensornode=info".to_string(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

impl Default for BuffersConfig {
    fn default() -> Self {
        Self {
            system_capacity: 256,
            readings_capacity: 1024,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mac: "02:00:00:00:00:01".to_string(),
            actuators: vec![1, 2],
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            teardown_steps: 3,
            static_ip: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

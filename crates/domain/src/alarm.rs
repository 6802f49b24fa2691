//! Per-sensor alarm thresholds.
//!
//! Thresholds are runtime-only: they are replaced wholesale by the `ALARM`
//! command and are never written to the configuration store.

use serde::{Deserialize, Serialize};

/// Number of sensor channels on the node (temperature, pressure, humidity,
/// movement).
pub const SENSOR_COUNT: usize = 4;

/// Low/high alarm bounds for one sensor channel. `None` disables a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorAlarm {
    pub low: Option<i16>,
    pub high: Option<i16>,
}

impl SensorAlarm {
    /// Whether `value` crosses one of the configured bounds.
    #[must_use]
    pub fn is_triggered_by(&self, value: i16) -> bool {
        self.low.is_some_and(|low| value < low) || self.high.is_some_and(|high| value > high)
    }
}

/// Alarm bounds for every sensor channel, indexed by channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmThresholds(pub [SensorAlarm; SENSOR_COUNT]);

impl AlarmThresholds {
    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&SensorAlarm> {
        self.0.get(index)
    }
}

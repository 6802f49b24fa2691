//! Records held in the node's append-only buffers and streamed back by
//! `SYSTEM` and `READINGS`.

use serde::{Deserialize, Serialize};

use crate::alarm::SENSOR_COUNT;

/// One diagnostic line from the system log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemLogEntry {
    /// RTC timestamp (seconds since the Unix epoch).
    pub timestamp: u32,
    pub message: String,
}

/// A raw sample of every sensor channel taken at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    /// RTC timestamp (seconds since the Unix epoch).
    pub timestamp: u32,
    /// Uncalibrated channel values, indexed like
    /// [`AlarmThresholds`](crate::alarm::AlarmThresholds).
    pub values: [i16; SENSOR_COUNT],
}

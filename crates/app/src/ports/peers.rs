//! Peer notifier ports: optional callbacks the engine invokes after a
//! configuration change or on behalf of a device command.
//!
//! Every capability is optional. An absent capability silently disables the
//! behaviour that depends on it; it is never an error.

use std::sync::Arc;

use sensornode_domain::command::ActuatorId;
use sensornode_domain::time::RtcTimestamp;

use super::network::{AddressingMode, SessionTeardown, WifiTeardown};

/// Drives the periodic telemetry task.
pub trait TelemetryScheduler: Send + Sync {
    /// Restart the periodic task with a new interval, in seconds.
    fn restart(&self, interval_secs: u32);
}

/// Physical movement sensor.
pub trait MovementSensor: Send + Sync {
    fn enable(&self);
    fn disable(&self);
}

/// Actuator control bus.
pub trait ActuatorControl: Send + Sync {
    /// Drive actuator `id` towards `value`.
    fn set(&self, id: ActuatorId, value: &str);
    /// Ask actuator `id` to report its state (reported asynchronously).
    fn request_state(&self, id: ActuatorId);
}

/// Application-defined status text.
pub trait StatusProvider: Send + Sync {
    /// Current status, at most `max_len` bytes.
    fn status(&self, max_len: usize) -> String;
}

/// Node-wide lifecycle actions triggered by `NOW` and `RELOAD`.
pub trait NodeLifecycle: Send + Sync {
    /// Exchange data with the backend as soon as possible.
    fn exchange_now(&self);
    /// Reset the node.
    fn reset(&self);
}

/// The node's real-time clock.
pub trait RealTimeClock: Send + Sync {
    fn now(&self) -> RtcTimestamp;
    fn set(&self, timestamp: RtcTimestamp);
}

/// The set of optional collaborators wired into the engine.
#[derive(Default, Clone)]
pub struct Peers {
    pub telemetry: Option<Arc<dyn TelemetryScheduler>>,
    pub movement: Option<Arc<dyn MovementSensor>>,
    pub actuators: Option<Arc<dyn ActuatorControl>>,
    pub status: Option<Arc<dyn StatusProvider>>,
    pub lifecycle: Option<Arc<dyn NodeLifecycle>>,
    pub clock: Option<Arc<dyn RealTimeClock>>,
    pub session: Option<Arc<dyn SessionTeardown>>,
    pub wifi: Option<Arc<dyn WifiTeardown>>,
    pub addressing: Option<Arc<dyn AddressingMode>>,
}

impl Peers {
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetryScheduler>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: Arc<dyn MovementSensor>) -> Self {
        self.movement = Some(movement);
        self
    }

    #[must_use]
    pub fn with_actuators(mut self, actuators: Arc<dyn ActuatorControl>) -> Self {
        self.actuators = Some(actuators);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Arc<dyn StatusProvider>) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_lifecycle(mut self, lifecycle: Arc<dyn NodeLifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn RealTimeClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn SessionTeardown>) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn with_wifi(mut self, wifi: Arc<dyn WifiTeardown>) -> Self {
        self.wifi = Some(wifi);
        self
    }

    #[must_use]
    pub fn with_addressing(mut self, addressing: Arc<dyn AddressingMode>) -> Self {
        self.addressing = Some(addressing);
        self
    }
}

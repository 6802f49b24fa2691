//! # sensornode-adapter-virtual
//!
//! Simulated node peripherals, for running the command engine off-device.
//!
//! ## Provided peripherals
//!
//! | Peripheral | Port | Behaviour |
//! |------------|------|-----------|
//! | [`VirtualClock`] | `RealTimeClock` | Wall clock shifted by the last `set` |
//! | [`VirtualTelemetry`] | `TelemetryScheduler` | Publishes the active interval to [`sample_readings`] |
//! | [`VirtualMovementSensor`] | `MovementSensor` | Counts detections while armed and flagged |
//! | [`VirtualActuators`] | `ActuatorControl` | Keeps targets, reports state on request |
//! | [`VirtualLifecycle`] | `NodeLifecycle`, `StatusProvider` | Counts exchanges and resets |
//! | [`VirtualNetwork`] | `SessionTeardown`, `WifiTeardown`, `AddressingMode` | Teardowns finish after a fixed number of polls |
//! | [`RingLog`] | `RecordBuffer` | Bounded log, oldest record dropped first |
//! | [`BoundedResponse`] | `ResponseWriter` | Refuses items past its capacity |
//!
//! ## Dependency rule
//!
//! Depends on `sensornode-app` (port traits) and `sensornode-domain` only.

mod clock;
mod devices;
mod network;
mod response;
mod ring_log;
mod sampler;

use std::sync::Arc;

use sensornode_app::ports::Peers;
use sensornode_domain::command::ActuatorId;
use sensornode_domain::config::MovementFlag;

pub use clock::VirtualClock;
pub use devices::{VirtualActuators, VirtualLifecycle, VirtualMovementSensor, VirtualTelemetry};
pub use network::VirtualNetwork;
pub use response::BoundedResponse;
pub use ring_log::RingLog;
pub use sampler::sample_readings;

/// Every virtual peripheral of one node, shared with the engine.
pub struct VirtualNode {
    pub clock: Arc<VirtualClock>,
    pub telemetry: Arc<VirtualTelemetry>,
    pub movement: Arc<VirtualMovementSensor>,
    pub actuators: Arc<VirtualActuators>,
    pub lifecycle: Arc<VirtualLifecycle>,
    pub network: Arc<VirtualNetwork>,
}

impl VirtualNode {
    /// Build a node whose telemetry starts at `heartbeat` seconds, whose
    /// movement sensor honours `movement` and whose network teardowns take
    /// `teardown_steps` polls.
    #[must_use]
    pub fn new(
        heartbeat: u32,
        movement: MovementFlag,
        actuators: &[ActuatorId],
        teardown_steps: usize,
        static_addressing: bool,
    ) -> Self {
        Self {
            clock: Arc::new(VirtualClock::default()),
            telemetry: Arc::new(VirtualTelemetry::new(heartbeat)),
            movement: Arc::new(VirtualMovementSensor::new(movement)),
            actuators: Arc::new(VirtualActuators::new(actuators)),
            lifecycle: Arc::new(VirtualLifecycle::default()),
            network: Arc::new(VirtualNetwork::new(teardown_steps, static_addressing)),
        }
    }

    /// Wire every peripheral into the engine's peer set.
    #[must_use]
    pub fn peers(&self) -> Peers {
        Peers::default()
            .with_clock(self.clock.clone())
            .with_telemetry(self.telemetry.clone())
            .with_movement(self.movement.clone())
            .with_actuators(self.actuators.clone())
            .with_lifecycle(self.lifecycle.clone())
            .with_status(self.lifecycle.clone())
            .with_session(self.network.clone())
            .with_wifi(self.network.clone())
            .with_addressing(self.network.clone())
    }
}

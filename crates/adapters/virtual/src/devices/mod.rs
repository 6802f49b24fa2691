//! Simulated peripherals driven by the command engine's notifiers.

mod actuators;
mod lifecycle;
mod movement;
mod telemetry;

pub use actuators::VirtualActuators;
pub use lifecycle::VirtualLifecycle;
pub use movement::VirtualMovementSensor;
pub use telemetry::VirtualTelemetry;

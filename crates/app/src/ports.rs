//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the command engine and the outside world.
//! They are defined here (in `app`) so that both the engine and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod config_store;
pub mod network;
pub mod peers;
pub mod record_buffer;
pub mod response;

pub use config_store::ConfigStore;
pub use network::{AddressingMode, SessionTeardown, Teardown, TeardownStatus, WifiTeardown};
pub use peers::{
    ActuatorControl, MovementSensor, NodeLifecycle, Peers, RealTimeClock, StatusProvider,
    TelemetryScheduler,
};
pub use record_buffer::RecordBuffer;
pub use response::ResponseWriter;

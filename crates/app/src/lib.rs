//! # sensornode-app
//!
//! Application layer: the command engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ConfigStore`: durable keyed parameter storage
//!   - `RecordBuffer`: indexed read/clear access to the log buffers
//!   - `ResponseWriter`: bounded append-only response sink
//!   - peer notifiers and network teardown capabilities
//! - Provide the **command engine**: dispatcher, field handlers, chunked
//!   streamer and reconnection coordinator
//! - Restore the configuration aggregate from the store at boot
//!
//! ## Dependency rule
//! Depends on `sensornode-domain` only (plus `tokio` for cooperative yield).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod ports;
pub mod reconnect;
pub mod restore;

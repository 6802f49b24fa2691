//! # sensornode-adapter-storage-json
//!
//! Configuration store adapters.
//!
//! ## Responsibilities
//! - Implement the `ConfigStore` port defined in `sensornode-app::ports`
//! - [`InMemoryConfigStore`]: volatile map, for tests and dry runs
//! - [`JsonFileConfigStore`]: one JSON document holding every persisted
//!   parameter, rewritten atomically on each write
//!
//! ## Dependency rule
//! Depends on `sensornode-app` (for port traits) and `sensornode-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileConfigStore;
pub use memory::InMemoryConfigStore;

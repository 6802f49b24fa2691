//! Configuration store port: durable key/value storage for parameters.

use std::future::Future;

use sensornode_domain::config::{ConfigKey, ConfigValue};
use sensornode_domain::error::NodeError;

/// Durable storage for raw configuration values, keyed by [`ConfigKey`].
pub trait ConfigStore {
    /// Persist `value` under `key`, replacing any previous value.
    fn write(
        &self,
        key: ConfigKey,
        value: ConfigValue,
    ) -> impl Future<Output = Result<(), NodeError>> + Send;

    /// Read the value stored under `key`, if any.
    fn read(
        &self,
        key: ConfigKey,
    ) -> impl Future<Output = Result<Option<ConfigValue>, NodeError>> + Send;
}

impl<T: ConfigStore + Send + Sync> ConfigStore for std::sync::Arc<T> {
    fn write(
        &self,
        key: ConfigKey,
        value: ConfigValue,
    ) -> impl Future<Output = Result<(), NodeError>> + Send {
        (**self).write(key, value)
    }

    fn read(
        &self,
        key: ConfigKey,
    ) -> impl Future<Output = Result<Option<ConfigValue>, NodeError>> + Send {
        (**self).read(key)
    }
}

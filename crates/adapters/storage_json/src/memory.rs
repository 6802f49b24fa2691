//! Volatile [`ConfigStore`] backed by a map.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;

use sensornode_app::ports::ConfigStore;
use sensornode_domain::config::{ConfigKey, ConfigValue};
use sensornode_domain::error::NodeError;

/// In-memory configuration store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    values: RwLock<HashMap<ConfigKey, ConfigValue>>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters stored so far.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn write(
        &self,
        key: ConfigKey,
        value: ConfigValue,
    ) -> impl Future<Output = Result<(), NodeError>> + Send {
        async move {
            self.values.write().await.insert(key, value);
            Ok(())
        }
    }

    fn read(
        &self,
        key: ConfigKey,
    ) -> impl Future<Output = Result<Option<ConfigValue>, NodeError>> + Send {
        async move { Ok(self.values.read().await.get(&key).cloned()) }
    }
}

//! [`ConfigStore`] persisted as a single JSON document.
//!
//! The document maps each key's snake-case name to its tagged value:
//!
//! ```json
//! { "system_heartbeat": { "type": "u32", "value": 60 } }
//! ```
//!
//! Every write rewrites the whole file through a sibling temporary file and
//! a rename, so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use sensornode_app::ports::ConfigStore;
use sensornode_domain::config::{ConfigKey, ConfigValue};
use sensornode_domain::error::NodeError;

use crate::error::StoreError;

type Document = BTreeMap<String, ConfigValue>;

/// File-backed configuration store.
#[derive(Debug)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    values: Mutex<Document>,
}

impl JsonFileConfigStore {
    /// Open the store at `path`, loading the existing document if there is
    /// one. A missing file is treated as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no configuration file yet, starting empty");
                Document::new()
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        tracing::debug!(entries = values.len(), "configuration file loaded");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, key: ConfigKey, value: ConfigValue) -> Result<(), StoreError> {
        // Held across the file replacement so concurrent writes land in order.
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        next.insert(key.as_str().to_string(), value);
        let bytes = serde_json::to_vec_pretty(&next)?;

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        *values = next;
        Ok(())
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn write(
        &self,
        key: ConfigKey,
        value: ConfigValue,
    ) -> impl Future<Output = Result<(), NodeError>> + Send {
        async move {
            self.persist(key, value).await?;
            tracing::debug!(%key, "parameter written");
            Ok(())
        }
    }

    fn read(
        &self,
        key: ConfigKey,
    ) -> impl Future<Output = Result<Option<ConfigValue>, NodeError>> + Send {
        async move { Ok(self.values.lock().await.get(key.as_str()).cloned()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensornode_domain::address::KnxAddress;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sensornode-store-{}-{name}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn should_start_empty_when_file_missing() {
        let path = scratch_path("missing");

        let store = JsonFileConfigStore::open(&path).await.unwrap();

        assert!(store.read(ConfigKey::DeviceId).await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn should_survive_reopen() {
        let path = scratch_path("reopen");
        let store = JsonFileConfigStore::open(&path).await.unwrap();
        store
            .write(ConfigKey::WifiSsid, ConfigValue::Text("home".into()))
            .await
            .unwrap();
        store
            .write(
                ConfigKey::KnxGroupAddress,
                ConfigValue::Address(KnxAddress([0x0a, 0x02])),
            )
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileConfigStore::open(&path).await.unwrap();

        assert_eq!(
            reopened.read(ConfigKey::WifiSsid).await.unwrap(),
            Some(ConfigValue::Text("home".into()))
        );
        assert_eq!(
            reopened.read(ConfigKey::KnxGroupAddress).await.unwrap(),
            Some(ConfigValue::Address(KnxAddress([0x0a, 0x02])))
        );
    }

    #[tokio::test]
    async fn should_key_document_by_parameter_name() {
        let path = scratch_path("layout");
        let store = JsonFileConfigStore::open(&path).await.unwrap();
        store
            .write(ConfigKey::SystemHeartbeat, ConfigValue::U32(60))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();

        assert!(raw.get("system_heartbeat").is_some());
    }

    #[tokio::test]
    async fn should_reject_corrupt_file() {
        let path = scratch_path("corrupt");
        std::fs::write(&path, b"not json").unwrap();

        let err = JsonFileConfigStore::open(&path).await.unwrap_err();

        assert!(matches!(err, StoreError::Json(_)));
    }

    #[tokio::test]
    async fn should_report_io_failure_as_storage_error() {
        let base = scratch_path("unwritable");
        let store = JsonFileConfigStore::open(base.join("nested/config.json"))
            .await
            .unwrap();

        let err = store
            .write(ConfigKey::Ssl, ConfigValue::Bool(true))
            .await
            .unwrap_err();

        assert!(matches!(err, NodeError::Storage(_)));
    }

    #[tokio::test]
    async fn should_not_expose_value_that_failed_to_persist() {
        let base = scratch_path("uncommitted");
        let store = JsonFileConfigStore::open(base.join("nested/config.json"))
            .await
            .unwrap();

        store
            .write(ConfigKey::Ssl, ConfigValue::Bool(true))
            .await
            .unwrap_err();

        assert!(store.read(ConfigKey::Ssl).await.unwrap().is_none());
    }
}

//! Boot-time restore of the configuration aggregate.

use sensornode_domain::config::{ConfigKey, DeviceConfig};
use sensornode_domain::error::NodeError;

use crate::ports::ConfigStore;

/// Build a [`DeviceConfig`] from defaults overlaid with every value found in
/// `store`.
///
/// Values stored with the wrong type are skipped with a warning so one bad
/// entry cannot keep the node from booting.
///
/// # Errors
///
/// Returns an error if the store itself cannot be read.
#[tracing::instrument(skip_all)]
pub async fn load_config<S: ConfigStore>(store: &S) -> Result<DeviceConfig, NodeError> {
    let mut config = DeviceConfig::default();
    let mut restored = 0usize;
    for key in ConfigKey::ALL {
        let Some(value) = store.read(key).await? else {
            continue;
        };
        match config.apply(key, value) {
            Ok(()) => restored += 1,
            Err(err) => tracing::warn!(error = %err, "ignoring stored value"),
        }
    }
    tracing::info!(restored, "configuration restored");
    Ok(config)
}

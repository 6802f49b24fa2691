//! Configuration file error types.

use sensornode_domain::error::NodeError;

/// Errors originating from the configuration file layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or replacing the file failed.
    #[error("configuration file I/O error")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration document.
    #[error("configuration file is not valid JSON")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Convert into a [`NodeError::Storage`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> NodeError {
        NodeError::Storage(Box::new(self))
    }
}

impl From<StoreError> for NodeError {
    fn from(err: StoreError) -> Self {
        err.into_domain()
    }
}

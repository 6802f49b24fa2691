//! Response writer with a fixed item budget.

use sensornode_app::ports::ResponseWriter;
use sensornode_domain::error::ResponseFull;
use sensornode_domain::response::ResponseItem;

/// Collects response items up to `capacity`, refusing the rest.
#[derive(Debug, Clone)]
pub struct BoundedResponse {
    capacity: usize,
    items: Vec<ResponseItem>,
}

impl BoundedResponse {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ResponseItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<ResponseItem> {
        self.items
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }
}

impl ResponseWriter for BoundedResponse {
    fn append(&mut self, item: ResponseItem) -> Result<(), ResponseFull> {
        if self.remaining() == 0 {
            return Err(ResponseFull);
        }
        self.items.push(item);
        Ok(())
    }
}

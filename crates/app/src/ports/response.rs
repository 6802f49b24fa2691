//! Response port: the bounded sink handlers append their results to.

use sensornode_domain::error::ResponseFull;
use sensornode_domain::response::ResponseItem;

/// Append-only response sink with bounded capacity.
///
/// The implementation owns the wire encoding; the engine only pushes
/// semantic values.
pub trait ResponseWriter {
    /// Append one item.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseFull`] when the item does not fit; the response is
    /// left unchanged.
    fn append(&mut self, item: ResponseItem) -> Result<(), ResponseFull>;
}

/// Unbounded writer, handy for tests and tooling.
impl ResponseWriter for Vec<ResponseItem> {
    fn append(&mut self, item: ResponseItem) -> Result<(), ResponseFull> {
        self.push(item);
        Ok(())
    }
}

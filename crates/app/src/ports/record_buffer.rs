//! Record buffer port: the chunked-read contract of the node's append-only
//! logs (system log, sensor readings).

/// Read access to an append-only record buffer, indexed from the oldest
/// record still held.
///
/// Methods take `&self`: the buffer is also appended to by the sampling
/// side, so implementations synchronise internally.
pub trait RecordBuffer {
    type Record;

    /// Number of records currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<Self::Record>;

    /// Drop every record.
    fn clear(&self);
}

impl<T: RecordBuffer> RecordBuffer for std::sync::Arc<T> {
    type Record = T::Record;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<Self::Record> {
        (**self).get(index)
    }

    fn clear(&self) {
        (**self).clear();
    }
}

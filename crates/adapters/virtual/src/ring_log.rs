//! Bounded in-memory record log.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use sensornode_app::ports::RecordBuffer;

/// Append-only log holding at most `capacity` records. Appending to a full
/// log drops the oldest record, so indices shift by one.
#[derive(Debug)]
pub struct RingLog<T> {
    capacity: usize,
    records: Mutex<VecDeque<T>>,
}

impl<T> RingLog<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, record: T) {
        if self.capacity == 0 {
            return;
        }
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> RecordBuffer for RingLog<T> {
    type Record = T;

    fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

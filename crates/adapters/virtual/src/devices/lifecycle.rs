//! Virtual node lifecycle and application status.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use sensornode_app::ports::{NodeLifecycle, StatusProvider};

#[derive(Debug)]
pub struct VirtualLifecycle {
    started: DateTime<Utc>,
    exchanges: AtomicUsize,
    resets: AtomicUsize,
}

impl Default for VirtualLifecycle {
    fn default() -> Self {
        Self {
            started: Utc::now(),
            exchanges: AtomicUsize::new(0),
            resets: AtomicUsize::new(0),
        }
    }
}

impl VirtualLifecycle {
    #[must_use]
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }
}

impl NodeLifecycle for VirtualLifecycle {
    fn exchange_now(&self) {
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        tracing::info!("data exchange triggered");
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("node reset requested");
    }
}

impl StatusProvider for VirtualLifecycle {
    fn status(&self, max_len: usize) -> String {
        let uptime = (Utc::now() - self.started).num_seconds();
        let status = format!(
            "UPTIME:{uptime};EXCHANGES:{};RESETS:{}",
            self.exchanges(),
            self.resets()
        );
        status.chars().take(max_len).collect()
    }
}

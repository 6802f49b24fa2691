use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

use sensornode_app::ports::TelemetryScheduler;

/// Publishes the interval of the periodic telemetry task to its subscribers.
#[derive(Debug)]
pub struct VirtualTelemetry {
    interval: watch::Sender<u32>,
    restarts: AtomicUsize,
}

impl VirtualTelemetry {
    #[must_use]
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval: watch::Sender::new(interval_secs),
            restarts: AtomicUsize::new(0),
        }
    }

    /// Current interval, in seconds.
    #[must_use]
    pub fn interval(&self) -> u32 {
        *self.interval.borrow()
    }

    #[must_use]
    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::Relaxed)
    }

    /// Receiver notified on every restart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.interval.subscribe()
    }
}

impl TelemetryScheduler for VirtualTelemetry {
    fn restart(&self, interval_secs: u32) {
        // Sent even when unchanged so subscribers rebuild their timer.
        self.interval.send_replace(interval_secs);
        self.restarts.fetch_add(1, Ordering::Relaxed);
        tracing::info!(interval_secs, "telemetry timer restarted");
    }
}

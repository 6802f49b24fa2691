//! Virtual real-time clock: the host wall clock shifted by the last `set`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{TimeDelta, Utc};

use sensornode_app::ports::RealTimeClock;
use sensornode_domain::time::{self, RtcTimestamp};

#[derive(Debug, Default)]
pub struct VirtualClock {
    offset_secs: AtomicI64,
}

impl RealTimeClock for VirtualClock {
    fn now(&self) -> RtcTimestamp {
        let offset = TimeDelta::seconds(self.offset_secs.load(Ordering::Relaxed));
        time::to_rtc(Utc::now() + offset)
    }

    fn set(&self, timestamp: RtcTimestamp) {
        let offset = i64::from(timestamp) - Utc::now().timestamp();
        self.offset_secs.store(offset, Ordering::Relaxed);
        tracing::debug!(timestamp, offset, "virtual clock adjusted");
    }
}

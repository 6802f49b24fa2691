//! Time helpers for the node's 32-bit real-time clock.

use chrono::{DateTime, Utc};

/// RTC timestamp: whole seconds since the Unix epoch.
pub type RtcTimestamp = u32;

/// Convert a wall-clock instant to an RTC timestamp, saturating at the
/// bounds of the 32-bit counter.
#[must_use]
pub fn to_rtc(instant: DateTime<Utc>) -> RtcTimestamp {
    let seconds = instant.timestamp().max(0);
    RtcTimestamp::try_from(seconds).unwrap_or(RtcTimestamp::MAX)
}

/// Current UTC time as an RTC timestamp.
#[must_use]
pub fn now() -> RtcTimestamp {
    to_rtc(Utc::now())
}

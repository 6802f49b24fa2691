//! Synthetic sensor sampling, standing in for the sensor drivers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, Interval};

use sensornode_app::ports::RealTimeClock;
use sensornode_domain::record::SensorReading;

use crate::{RingLog, VirtualClock};

/// Append a synthetic reading to `readings` once per telemetry interval.
///
/// The first sample is taken immediately. Every value published on
/// `interval` restarts the timer with the new period, the first sample then
/// falling one full period later. Returns once the publisher is dropped.
pub async fn sample_readings(
    clock: Arc<VirtualClock>,
    readings: Arc<RingLog<SensorReading>>,
    mut interval: watch::Receiver<u32>,
) {
    let mut ticker = tokio::time::interval(period(*interval.borrow_and_update()));
    let mut tick: i16 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                readings.push(SensorReading {
                    timestamp: clock.now(),
                    values: [215 + tick % 10, 450 - tick % 20, 1013, tick % 2],
                });
                tick = tick.wrapping_add(1);
                tracing::debug!("sensor sample recorded");
            }
            changed = interval.changed() => {
                if changed.is_err() {
                    break;
                }
                let secs = *interval.borrow_and_update();
                ticker = restarted(period(secs));
                tracing::info!(interval_secs = secs, "sampling period changed");
            }
        }
    }
}

fn period(secs: u32) -> Duration {
    Duration::from_secs(u64::from(secs.max(1)))
}

fn restarted(period: Duration) -> Interval {
    tokio::time::interval_at(Instant::now() + period, period)
}

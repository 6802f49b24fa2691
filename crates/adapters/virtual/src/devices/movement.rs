//! Virtual PIR sensor. Detections are only counted while the sensor is
//! armed and the shared movement flag is set, mirroring the interrupt path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sensornode_app::ports::MovementSensor;
use sensornode_domain::config::MovementFlag;

#[derive(Debug)]
pub struct VirtualMovementSensor {
    flag: MovementFlag,
    armed: AtomicBool,
    detections: AtomicUsize,
}

impl VirtualMovementSensor {
    /// The sensor starts armed iff `flag` is already set.
    #[must_use]
    pub fn new(flag: MovementFlag) -> Self {
        let armed = AtomicBool::new(flag.get());
        Self {
            flag,
            armed,
            detections: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Simulate the sensor interrupt. Returns whether it was counted.
    pub fn trigger(&self) -> bool {
        if self.is_armed() && self.flag.get() {
            self.detections.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn detections(&self) -> usize {
        self.detections.load(Ordering::Relaxed)
    }
}

impl MovementSensor for VirtualMovementSensor {
    fn enable(&self) {
        self.armed.store(true, Ordering::Release);
        tracing::info!("movement sensor armed");
    }

    fn disable(&self) {
        self.armed.store(false, Ordering::Release);
        tracing::info!("movement sensor disarmed");
    }
}

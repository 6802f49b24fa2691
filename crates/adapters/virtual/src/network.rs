//! Virtual network link. A teardown completes after a fixed number of polls,
//! standing in for a session close or WiFi disassociation that takes a few
//! radio round trips.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sensornode_app::ports::{
    AddressingMode, SessionTeardown, Teardown, TeardownStatus, WifiTeardown,
};

#[derive(Debug)]
pub struct VirtualNetwork {
    steps: usize,
    static_active: AtomicBool,
    session_closes: AtomicUsize,
    wifi_disconnects: AtomicUsize,
    polls: Arc<AtomicUsize>,
}

impl VirtualNetwork {
    /// `steps` is how many polls report in-progress before completion.
    #[must_use]
    pub fn new(steps: usize, static_addressing: bool) -> Self {
        Self {
            steps,
            static_active: AtomicBool::new(static_addressing),
            session_closes: AtomicUsize::new(0),
            wifi_disconnects: AtomicUsize::new(0),
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_static_addressing(&self, active: bool) {
        self.static_active.store(active, Ordering::Relaxed);
    }

    #[must_use]
    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn wifi_disconnects(&self) -> usize {
        self.wifi_disconnects.load(Ordering::Relaxed)
    }

    /// Polls made across all teardowns so far.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }

    fn teardown(&self) -> Box<dyn Teardown> {
        Box::new(StepTeardown {
            remaining: self.steps,
            polls: Arc::clone(&self.polls),
        })
    }
}

struct StepTeardown {
    remaining: usize,
    polls: Arc<AtomicUsize>,
}

impl Teardown for StepTeardown {
    fn poll(&mut self) -> TeardownStatus {
        self.polls.fetch_add(1, Ordering::Relaxed);
        if self.remaining == 0 {
            return TeardownStatus::Complete;
        }
        self.remaining -= 1;
        TeardownStatus::InProgress
    }
}

impl SessionTeardown for VirtualNetwork {
    fn close_session(&self) -> Box<dyn Teardown> {
        self.session_closes.fetch_add(1, Ordering::Relaxed);
        tracing::info!("closing transport session");
        self.teardown()
    }
}

impl WifiTeardown for VirtualNetwork {
    fn disconnect(&self) -> Box<dyn Teardown> {
        self.wifi_disconnects.fetch_add(1, Ordering::Relaxed);
        tracing::info!("disconnecting wifi");
        self.teardown()
    }
}

impl AddressingMode for VirtualNetwork {
    fn is_static_active(&self) -> bool {
        self.static_active.load(Ordering::Relaxed)
    }
}

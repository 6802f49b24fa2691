//! Virtual actuators. Targets are applied immediately and every state
//! request is answered with a report, as a real actuator would publish it.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use sensornode_app::ports::ActuatorControl;
use sensornode_domain::command::ActuatorId;

/// State reported by an actuator that was never driven.
const INITIAL_STATE: &str = "OFF";

#[derive(Debug)]
pub struct VirtualActuators {
    states: Mutex<BTreeMap<ActuatorId, String>>,
    reports: Mutex<Vec<(ActuatorId, String)>>,
}

impl VirtualActuators {
    #[must_use]
    pub fn new(ids: &[ActuatorId]) -> Self {
        let states = ids
            .iter()
            .map(|id| (*id, INITIAL_STATE.to_string()))
            .collect();
        Self {
            states: Mutex::new(states),
            reports: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn state(&self, id: ActuatorId) -> Option<String> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Drain the state reports produced so far.
    pub fn take_reports(&self) -> Vec<(ActuatorId, String)> {
        std::mem::take(&mut *self.reports.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ActuatorControl for VirtualActuators {
    fn set(&self, id: ActuatorId, value: &str) {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        match states.get_mut(&id) {
            Some(state) => {
                value.clone_into(state);
                tracing::info!(%id, value, "actuator driven");
            }
            None => tracing::warn!(%id, "unknown actuator"),
        }
    }

    fn request_state(&self, id: ActuatorId) {
        let Some(state) = self.state(id) else {
            tracing::warn!(%id, "state requested for unknown actuator");
            return;
        };
        tracing::debug!(%id, state = %state, "actuator state reported");
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, state));
    }
}

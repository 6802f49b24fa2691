use sensornode_domain::command::{Argument, CommandType, ExecutionResult};
use sensornode_domain::device::STATUS_MAX_LEN;
use sensornode_domain::record::{SensorReading, SystemLogEntry};
use sensornode_domain::response::ResponseItem;

use super::{CommandEngine, HandlerResult, argument, respond};
use crate::ports::{ConfigStore, RecordBuffer, ResponseWriter};

impl<S, SL, RL> CommandEngine<S, SL, RL>
where
    S: ConfigStore,
    SL: RecordBuffer<Record = SystemLogEntry>,
    RL: RecordBuffer<Record = SensorReading>,
{
    /// Acknowledge, then trigger an immediate data exchange.
    pub(super) fn now<W: ResponseWriter>(&self, response: &mut W) -> HandlerResult {
        respond(response, ResponseItem::Done);
        if let Some(lifecycle) = &self.peers.lifecycle {
            lifecycle.exchange_now();
        }
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// Acknowledge, then reset the node.
    pub(super) fn reload<W: ResponseWriter>(&self, response: &mut W) -> HandlerResult {
        respond(response, ResponseItem::Done);
        if let Some(lifecycle) = &self.peers.lifecycle {
            tracing::info!("node reset requested");
            lifecycle.reset();
        }
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) fn rtc<W: ResponseWriter>(
        &self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let clock = self.peers.clock.as_ref();
        if let Some(argument) = argument {
            let timestamp = argument::unsigned(CommandType::Rtc, argument)?;
            match clock {
                Some(clock) => {
                    clock.set(timestamp);
                    tracing::info!(timestamp, "clock set");
                }
                None => tracing::debug!("no clock wired"),
            }
        }
        let now = clock.map_or(0, |clock| clock.now());
        respond(response, ResponseItem::number(CommandType::Rtc, now));
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) fn status<W: ResponseWriter>(&self, response: &mut W) -> HandlerResult {
        let status = self
            .peers
            .status
            .as_ref()
            .map(|provider| {
                let mut status = provider.status(STATUS_MAX_LEN);
                truncate(&mut status, STATUS_MAX_LEN);
                status
            })
            .unwrap_or_default();
        respond(response, ResponseItem::text(CommandType::Status, status));
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) fn version<W: ResponseWriter>(&self, response: &mut W) -> HandlerResult {
        respond(
            response,
            ResponseItem::text(CommandType::Version, self.info.firmware.to_string()),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) fn mac<W: ResponseWriter>(&self, response: &mut W) -> HandlerResult {
        respond(
            response,
            ResponseItem::Mac {
                address: self.info.mac,
            },
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// Drive one actuator and ask for its new state, or with no argument ask
    /// every known actuator for its state. Nothing is persisted.
    pub(super) fn set_actuator<W: ResponseWriter>(
        &self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let control = self.peers.actuators.as_ref();
        match argument {
            Some(argument) => {
                let target = argument::actuator(CommandType::Set, argument)?;
                if let Some(control) = control {
                    tracing::info!(id = %target.id, value = %target.value, "setting actuator");
                    control.set(target.id, &target.value);
                    control.request_state(target.id);
                }
            }
            None => {
                if let Some(control) = control {
                    for id in &self.info.actuators {
                        control.request_state(*id);
                    }
                }
            }
        }
        respond(response, ResponseItem::Done);
        Ok(ExecutionResult::ExecutedCompletely)
    }
}

/// Cut `text` to at most `max` bytes on a character boundary.
fn truncate(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

//! Command engine: routes each decoded command to exactly one handler.
//!
//! The engine owns the [`DeviceConfig`] and is the only thing that mutates
//! it. Commands run one at a time to completion (`&mut self`); the only
//! suspension point is the wait for a network teardown.
//!
//! Handlers live in submodules grouped by the pattern they follow:
//! - [`fields`]: plain, write-once identity and bulk (alarm) fields
//! - [`network`]: fields whose change forces a reconnection
//! - [`device`]: device actions (`NOW`, `RELOAD`, `RTC`, `SET`, …)
//! - [`streaming`]: chunked streaming of the record buffers

mod argument;
mod device;
mod fields;
mod network;
mod streaming;

use sensornode_domain::command::{Command, CommandType, ExecutionResult};
use sensornode_domain::config::{ConfigKey, DeviceConfig, MovementFlag};
use sensornode_domain::device::DeviceInfo;
use sensornode_domain::error::ValidationError;
use sensornode_domain::record::{SensorReading, SystemLogEntry};
use sensornode_domain::response::ResponseItem;

use crate::ports::{ConfigStore, Peers, RecordBuffer, ResponseWriter};
use crate::reconnect::{self, Link};

pub use streaming::stream_records;

/// What a handler reports back to the dispatcher. An error becomes a
/// bad-request response.
type HandlerResult = Result<ExecutionResult, ValidationError>;

/// The command & configuration protocol engine.
pub struct CommandEngine<S, SL, RL> {
    config: DeviceConfig,
    store: S,
    system_log: SL,
    readings: RL,
    peers: Peers,
    info: DeviceInfo,
}

impl<S, SL, RL> CommandEngine<S, SL, RL>
where
    S: ConfigStore,
    SL: RecordBuffer<Record = SystemLogEntry>,
    RL: RecordBuffer<Record = SensorReading>,
{
    /// Create an engine around an already-restored configuration.
    pub fn new(
        config: DeviceConfig,
        store: S,
        system_log: SL,
        readings: RL,
        peers: Peers,
        info: DeviceInfo,
    ) -> Self {
        Self {
            config,
            store,
            system_log,
            readings,
            peers,
            info,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Handle to the movement flag, for the sensor interrupt context.
    #[must_use]
    pub fn movement_flag(&self) -> MovementFlag {
        self.config.movement.clone()
    }

    /// Execute one command, appending its result to `response`.
    ///
    /// Unknown commands and invalid arguments produce a bad-request item and
    /// still report [`ExecutionResult::ExecutedCompletely`]. Streaming
    /// commands write their advanced cursor back into `command`.
    #[tracing::instrument(skip_all, fields(command = %command.command_type))]
    pub async fn execute<W: ResponseWriter>(
        &mut self,
        command: &mut Command,
        response: &mut W,
    ) -> ExecutionResult {
        let argument = &mut command.argument;
        let outcome = match command.command_type {
            CommandType::Now => self.now(response),
            CommandType::Reload => self.reload(response),
            CommandType::Heartbeat => self.heartbeat(argument.as_ref(), response).await,
            CommandType::Rtc => self.rtc(argument.as_ref(), response),
            CommandType::Status => self.status(response),
            CommandType::Version => self.version(response),
            CommandType::Id => {
                self.identity(
                    CommandType::Id,
                    ConfigKey::DeviceId,
                    |c| &mut c.device_id,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::Signature => {
                self.identity(
                    CommandType::Signature,
                    ConfigKey::DevicePresharedKey,
                    |c| &mut c.preshared_key,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::Movement => self.movement(argument.as_ref(), response).await,
            CommandType::Atmo => {
                self.flag(
                    CommandType::Atmo,
                    ConfigKey::Atmo,
                    |c| &mut c.atmo,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::System => self.stream_system(argument, response),
            CommandType::Readings => self.stream_readings(argument, response),
            CommandType::Alarm => self.alarm(argument.as_ref(), response),
            CommandType::Mac => self.mac(response),
            CommandType::Url => self.url(argument.as_ref(), response).await,
            CommandType::Port => self.port(argument.as_ref(), response).await,
            CommandType::Ssid => self.ssid(argument.as_ref(), response).await,
            CommandType::Pass => self.pass(argument.as_ref(), response).await,
            CommandType::Auth => self.auth(argument.as_ref(), response).await,
            CommandType::StaticIp => self.static_ip(argument.as_ref(), response).await,
            CommandType::StaticMask => self.static_mask(argument.as_ref(), response).await,
            CommandType::StaticGateway => self.static_gateway(argument.as_ref(), response).await,
            CommandType::StaticDns => self.static_dns(argument.as_ref(), response).await,
            CommandType::Set => self.set_actuator(argument.as_ref(), response),
            CommandType::KnxPhysicalAddress => {
                self.knx_address(
                    CommandType::KnxPhysicalAddress,
                    ConfigKey::KnxPhysicalAddress,
                    |c| &mut c.knx_physical_address,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::KnxGroupAddress => {
                self.knx_address(
                    CommandType::KnxGroupAddress,
                    ConfigKey::KnxGroupAddress,
                    |c| &mut c.knx_group_address,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::KnxMulticastAddress => {
                self.multicast_address(argument.as_ref(), response).await
            }
            CommandType::KnxMulticastPort => self.multicast_port(argument.as_ref(), response).await,
            CommandType::KnxNat => {
                self.flag(
                    CommandType::KnxNat,
                    ConfigKey::KnxNat,
                    |c| &mut c.knx_nat,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::Location => {
                self.flag(
                    CommandType::Location,
                    ConfigKey::Location,
                    |c| &mut c.location,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::Ssl => {
                self.flag(
                    CommandType::Ssl,
                    ConfigKey::Ssl,
                    |c| &mut c.ssl,
                    argument.as_ref(),
                    response,
                )
                .await
            }
            CommandType::Unknown => Err(ValidationError::UnknownCommand),
        };

        outcome.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "bad request");
            respond(response, ResponseItem::BadRequest);
            ExecutionResult::ExecutedCompletely
        })
    }

    /// Write the current in-memory value under `key` to the store.
    ///
    /// A store failure is logged and dropped: the node keeps running with the
    /// new in-memory value.
    async fn persist(&self, key: ConfigKey) {
        let value = self.config.value(key);
        if let Err(err) = self.store.write(key, value).await {
            tracing::warn!(%key, error = %err, "failed to persist configuration");
        }
    }

    /// Assign `value` to the field selected by `select` if it differs from
    /// the current value, then persist it. Returns whether it changed.
    async fn update<T: PartialEq>(
        &mut self,
        key: ConfigKey,
        select: fn(&mut DeviceConfig) -> &mut T,
        value: T,
    ) -> bool {
        let slot = select(&mut self.config);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.persist(key).await;
        true
    }

    /// Tear down `link` and wait for it to finish. No-op when the matching
    /// capability is not wired.
    async fn reconnect(&self, link: Link) {
        let token = match link {
            Link::Session => self.peers.session.as_ref().map(|s| s.close_session()),
            Link::Wifi => self.peers.wifi.as_ref().map(|w| w.disconnect()),
        };
        match token {
            Some(token) => {
                reconnect::wait_for_teardown(link, token).await;
            }
            None => tracing::debug!(%link, "no teardown capability wired"),
        }
    }
}

/// Append `item`, logging instead of failing when the response is full.
fn respond<W: ResponseWriter>(response: &mut W, item: ResponseItem) {
    if response.append(item).is_err() {
        tracing::warn!("response full, item dropped");
    }
}

#[cfg(test)]
pub(crate) mod testing;

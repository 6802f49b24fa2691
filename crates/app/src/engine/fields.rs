//! Configuration field handlers: plain get/set fields, write-once identity
//! fields and the bulk alarm-threshold field.

use sensornode_domain::address::KnxAddress;
use sensornode_domain::command::{Argument, CommandType, ExecutionResult};
use sensornode_domain::config::{ConfigKey, DeviceConfig};
use sensornode_domain::error::ValidationError;
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
    pub(super) async fn heartbeat<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let interval = argument::unsigned(CommandType::Heartbeat, argument)?;
            if self
                .update(ConfigKey::SystemHeartbeat, |c| &mut c.heartbeat, interval)
                .await
            {
                tracing::info!(interval, "heartbeat changed");
                if let Some(telemetry) = &self.peers.telemetry {
                    telemetry.restart(interval);
                }
            }
        }
        respond(
            response,
            ResponseItem::number(CommandType::Heartbeat, self.config.heartbeat),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// The flag is read by the sensor interrupt context, so it is stored with
    /// a single atomic write before the sensor is switched.
    pub(super) async fn movement<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let enabled = argument::flag(CommandType::Movement, argument)?;
            if self.config.movement.get() != enabled {
                self.config.movement.set(enabled);
                self.persist(ConfigKey::Movement).await;
                tracing::info!(enabled, "movement detection changed");
                if let Some(sensor) = &self.peers.movement {
                    if enabled {
                        sensor.enable();
                    } else {
                        sensor.disable();
                    }
                }
            }
        }
        respond(
            response,
            ResponseItem::status(CommandType::Movement, self.config.movement.get()),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// Plain boolean field without a notifier.
    pub(super) async fn flag<W: ResponseWriter>(
        &mut self,
        command: CommandType,
        key: ConfigKey,
        select: fn(&mut DeviceConfig) -> &mut bool,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let enabled = argument::flag(command, argument)?;
            if self.update(key, select, enabled).await {
                tracing::info!(%key, enabled, "flag changed");
            }
        }
        let enabled = *select(&mut self.config);
        respond(response, ResponseItem::status(command, enabled));
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) async fn knx_address<W: ResponseWriter>(
        &mut self,
        command: CommandType,
        key: ConfigKey,
        select: fn(&mut DeviceConfig) -> &mut KnxAddress,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let address = argument::address(command, argument)?;
            if self.update(key, select, address).await {
                tracing::info!(%key, %address, "KNX address changed");
            }
        }
        let address = *select(&mut self.config);
        respond(response, ResponseItem::KnxAddress { command, address });
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// Write-once field: accepted only while the current value is empty.
    pub(super) async fn identity<W: ResponseWriter>(
        &mut self,
        command: CommandType,
        key: ConfigKey,
        select: fn(&mut DeviceConfig) -> &mut String,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let value = argument::text(command, key, argument)?;
            let slot = select(&mut self.config);
            if !slot.is_empty() {
                return Err(ValidationError::AlreadySet { command });
            }
            value.clone_into(slot);
            self.persist(key).await;
            tracing::info!(%key, "identity field set");
        }
        let value = select(&mut self.config).clone();
        respond(response, ResponseItem::text(command, value));
        Ok(ExecutionResult::ExecutedCompletely)
    }

    /// Thresholds are replaced wholesale on every set and are not persisted.
    pub(super) fn alarm<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            self.config.alarms = argument::alarms(CommandType::Alarm, argument)?;
            tracing::debug!("alarm thresholds replaced");
        }
        respond(
            response,
            ResponseItem::Alarms {
                thresholds: self.config.alarms,
            },
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::testing::*;
    use sensornode_domain::address::KnxAddress;
    use sensornode_domain::alarm::{AlarmThresholds, SensorAlarm};
    use sensornode_domain::command::{Argument, Command, CommandType, ExecutionResult};
    use sensornode_domain::config::{ConfigKey, ConfigValue};
    use sensornode_domain::response::ResponseItem;

    #[tokio::test]
    async fn should_not_write_when_heartbeat_unchanged() {
        let mut harness = Harness::default();
        let mut command = Command::set(CommandType::Heartbeat, Argument::Unsigned(300));

        harness.run(&mut command).await;

        assert!(harness.store.writes().is_empty());
        assert!(harness.peers.calls().is_empty());
        assert_eq!(
            harness.response,
            vec![ResponseItem::number(CommandType::Heartbeat, 300u32)]
        );
    }

    #[tokio::test]
    async fn should_persist_and_notify_when_heartbeat_changes() {
        let mut harness = Harness::default();
        let mut command = Command::set(CommandType::Heartbeat, Argument::Unsigned(60));

        harness.run(&mut command).await;

        assert_eq!(
            harness.store.writes(),
            vec![(ConfigKey::SystemHeartbeat, ConfigValue::U32(60))]
        );
        assert_eq!(harness.peers.calls(), vec![PeerCall::RestartTelemetry(60)]);
        assert_eq!(
            harness.response,
            vec![ResponseItem::number(CommandType::Heartbeat, 60u32)]
        );
    }

    #[tokio::test]
    async fn should_change_heartbeat_without_notifier_wired() {
        let mut harness = Harness::without_peers();
        let mut command = Command::set(CommandType::Heartbeat, Argument::Unsigned(60));

        harness.run(&mut command).await;

        assert_eq!(harness.engine.config().heartbeat, 60);
        assert_eq!(harness.store.writes().len(), 1);
    }

    #[tokio::test]
    async fn should_enable_movement_sensor_after_storing_flag() {
        let mut harness = Harness::default();
        let mut command = Command::set(CommandType::Movement, Argument::Flag(true));

        harness.run(&mut command).await;

        assert_eq!(
            harness.store.writes(),
            vec![(ConfigKey::Movement, ConfigValue::Bool(true))]
        );
        assert_eq!(harness.peers.calls(), vec![PeerCall::EnableMovement]);
        assert_eq!(harness.peers.movement_seen(), vec![true]);
        assert_eq!(
            harness.response,
            vec![ResponseItem::status(CommandType::Movement, true)]
        );
    }

    #[tokio::test]
    async fn should_disable_movement_sensor() {
        let mut harness = Harness::default();
        harness.engine_config_mut().movement.set(true);
        let mut command = Command::set(CommandType::Movement, Argument::Flag(false));

        harness.run(&mut command).await;

        assert_eq!(harness.peers.calls(), vec![PeerCall::DisableMovement]);
        assert_eq!(harness.peers.movement_seen(), vec![false]);
        assert!(!harness.engine.config().movement.get());
    }

    #[tokio::test]
    async fn should_persist_plain_flags_under_their_keys() {
        let cases = [
            (CommandType::Atmo, ConfigKey::Atmo, false),
            (CommandType::KnxNat, ConfigKey::KnxNat, true),
            (CommandType::Location, ConfigKey::Location, true),
            (CommandType::Ssl, ConfigKey::Ssl, true),
        ];
        for (command_type, key, value) in cases {
            let mut harness = Harness::default();
            let mut command = Command::set(command_type, Argument::Flag(value));

            harness.run(&mut command).await;

            assert_eq!(
                harness.store.writes(),
                vec![(key, ConfigValue::Bool(value))],
                "{command_type}"
            );
            assert_eq!(
                harness.response,
                vec![ResponseItem::status(command_type, value)],
                "{command_type}"
            );
        }
    }

    #[tokio::test]
    async fn should_update_knx_group_address() {
        let mut harness = Harness::default();
        let address = KnxAddress([0x0a, 0x02]);
        let mut command = Command::set(CommandType::KnxGroupAddress, Argument::Address(address));

        harness.run(&mut command).await;

        assert_eq!(
            harness.store.writes(),
            vec![(ConfigKey::KnxGroupAddress, ConfigValue::Address(address))]
        );
        assert_eq!(
            harness.response,
            vec![ResponseItem::KnxAddress {
                command: CommandType::KnxGroupAddress,
                address,
            }]
        );
    }

    #[tokio::test]
    async fn should_skip_write_for_unchanged_knx_address() {
        let mut harness = Harness::default();
        let address = KnxAddress([0x11, 0x05]);
        harness.engine_config_mut().knx_physical_address = address;
        let mut command =
            Command::set(CommandType::KnxPhysicalAddress, Argument::Address(address));

        harness.run(&mut command).await;

        assert!(harness.store.writes().is_empty());
        assert_eq!(
            harness.response,
            vec![ResponseItem::KnxAddress {
                command: CommandType::KnxPhysicalAddress,
                address,
            }]
        );
    }

    #[tokio::test]
    async fn should_set_identity_once() {
        let mut harness = Harness::default();

        let mut first = Command::set(CommandType::Id, Argument::Text("abc".into()));
        harness.run(&mut first).await;
        assert_eq!(
            harness.store.writes(),
            vec![(ConfigKey::DeviceId, ConfigValue::Text("abc".into()))]
        );
        assert_eq!(
            harness.take_response(),
            vec![ResponseItem::text(CommandType::Id, "abc")]
        );

        let mut second = Command::set(CommandType::Id, Argument::Text("xyz".into()));
        let result = harness.run(&mut second).await;

        assert_eq!(result, ExecutionResult::ExecutedCompletely);
        assert_eq!(harness.response, vec![ResponseItem::BadRequest]);
        assert_eq!(harness.store.writes().len(), 1);
        assert_eq!(harness.engine.config().device_id, "abc");
    }

    #[tokio::test]
    async fn should_report_signature_without_argument() {
        let mut harness = Harness::default();
        harness.engine_config_mut().preshared_key = "secret".to_string();
        let mut command = Command::get(CommandType::Signature);

        harness.run(&mut command).await;

        assert_eq!(
            harness.response,
            vec![ResponseItem::text(CommandType::Signature, "secret")]
        );
    }

    #[tokio::test]
    async fn should_reject_signature_rewrite() {
        let mut harness = Harness::default();
        harness.engine_config_mut().preshared_key = "secret".to_string();
        let mut command = Command::set(CommandType::Signature, Argument::Text("other".into()));

        harness.run(&mut command).await;

        assert_eq!(harness.response, vec![ResponseItem::BadRequest]);
        assert_eq!(harness.engine.config().preshared_key, "secret");
        assert!(harness.store.writes().is_empty());
    }

    #[tokio::test]
    async fn should_overwrite_alarms_even_when_identical() {
        let mut harness = Harness::default();
        let mut thresholds = AlarmThresholds::default();
        thresholds.0[0] = SensorAlarm {
            low: Some(-100),
            high: Some(400),
        };

        for _ in 0..2 {
            let mut command = Command::set(CommandType::Alarm, Argument::Alarms(thresholds));
            harness.run(&mut command).await;
            assert_eq!(
                harness.take_response(),
                vec![ResponseItem::Alarms { thresholds }]
            );
        }

        assert_eq!(harness.engine.config().alarms, thresholds);
        assert!(harness.store.writes().is_empty());
    }
}

//! Network field handlers. Any accepted change persists the new value and
//! then tears down the affected link before the handler returns.

use sensornode_domain::command::{Argument, CommandType, ExecutionResult};
use sensornode_domain::config::{ConfigKey, DeviceConfig};
use sensornode_domain::record::{SensorReading, SystemLogEntry};
use sensornode_domain::response::ResponseItem;

use super::{CommandEngine, HandlerResult, argument, respond};
use crate::ports::{ConfigStore, RecordBuffer, ResponseWriter};
use crate::reconnect::Link;

/// Clears SSID or password instead of setting it.
const CLEAR_SENTINEL: &str = "NULL";

/// Switches the node back to dynamic addressing.
const DYNAMIC_ADDRESSING_SENTINEL: &str = "OFF";

/// When a change to a text field forces the link down.
#[derive(Debug, Clone, Copy)]
enum Reconnect {
    Always(Link),
    /// Only while static addressing is the active mode.
    IfStatic,
}

/// A text parameter that affects network addressing.
struct NetworkText {
    command: CommandType,
    key: ConfigKey,
    select: fn(&mut DeviceConfig) -> &mut String,
    reconnect: Reconnect,
    clearable: bool,
}

impl<S, SL, RL> CommandEngine<S, SL, RL>
where
    S: ConfigStore,
    SL: RecordBuffer<Record = SystemLogEntry>,
    RL: RecordBuffer<Record = SensorReading>,
{
    pub(super) async fn url<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::Url,
            key: ConfigKey::ServerIp,
            select: |c| &mut c.server_url,
            reconnect: Reconnect::Always(Link::Session),
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn multicast_address<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::KnxMulticastAddress,
            key: ConfigKey::KnxMulticastAddress,
            select: |c| &mut c.multicast_address,
            reconnect: Reconnect::Always(Link::Session),
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn ssid<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::Ssid,
            key: ConfigKey::WifiSsid,
            select: |c| &mut c.wifi_ssid,
            reconnect: Reconnect::Always(Link::Wifi),
            clearable: true,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn pass<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::Pass,
            key: ConfigKey::WifiPass,
            select: |c| &mut c.wifi_password,
            reconnect: Reconnect::Always(Link::Wifi),
            clearable: true,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn static_mask<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::StaticMask,
            key: ConfigKey::WifiStaticMask,
            select: |c| &mut c.static_mask,
            reconnect: Reconnect::IfStatic,
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn static_gateway<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::StaticGateway,
            key: ConfigKey::WifiStaticGateway,
            select: |c| &mut c.static_gateway,
            reconnect: Reconnect::IfStatic,
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn static_dns<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        let field = NetworkText {
            command: CommandType::StaticDns,
            key: ConfigKey::WifiStaticDns,
            select: |c| &mut c.static_dns,
            reconnect: Reconnect::IfStatic,
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    /// `"OFF"` clears the whole static quadruple and always reconnects;
    /// any other value behaves like the other static fields.
    pub(super) async fn static_ip<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(Argument::Text(value)) = argument
            && value == DYNAMIC_ADDRESSING_SENTINEL
        {
            self.config.static_ip.clear();
            self.persist(ConfigKey::WifiStaticIp).await;
            self.config.static_mask.clear();
            self.persist(ConfigKey::WifiStaticMask).await;
            self.config.static_gateway.clear();
            self.persist(ConfigKey::WifiStaticGateway).await;
            self.config.static_dns.clear();
            self.persist(ConfigKey::WifiStaticDns).await;
            tracing::info!("dynamic addressing selected");

            self.reconnect(Link::Wifi).await;
            respond(response, ResponseItem::text(CommandType::StaticIp, ""));
            return Ok(ExecutionResult::ExecutedCompletely);
        }

        let field = NetworkText {
            command: CommandType::StaticIp,
            key: ConfigKey::WifiStaticIp,
            select: |c| &mut c.static_ip,
            reconnect: Reconnect::IfStatic,
            clearable: false,
        };
        self.network_text(&field, argument, response).await
    }

    pub(super) async fn port<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            self.config.server_port = argument::bounded(CommandType::Port, argument)?;
            self.persist(ConfigKey::ServerPort).await;
            tracing::info!(port = self.config.server_port, "server port changed");
            self.reconnect(Link::Session).await;
        }
        respond(
            response,
            ResponseItem::number(CommandType::Port, self.config.server_port),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) async fn multicast_port<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            self.config.multicast_port = argument::bounded(CommandType::KnxMulticastPort, argument)?;
            self.persist(ConfigKey::KnxMulticastPort).await;
            tracing::info!(port = self.config.multicast_port, "multicast port changed");
            self.reconnect(Link::Session).await;
        }
        respond(
            response,
            ResponseItem::number(CommandType::KnxMulticastPort, self.config.multicast_port),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    pub(super) async fn auth<W: ResponseWriter>(
        &mut self,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            self.config.wifi_auth = argument::bounded(CommandType::Auth, argument)?;
            self.persist(ConfigKey::WifiAuth).await;
            tracing::info!(auth = self.config.wifi_auth, "wifi auth mode changed");
            self.reconnect(Link::Wifi).await;
        }
        respond(
            response,
            ResponseItem::number(CommandType::Auth, self.config.wifi_auth),
        );
        Ok(ExecutionResult::ExecutedCompletely)
    }

    async fn network_text<W: ResponseWriter>(
        &mut self,
        field: &NetworkText,
        argument: Option<&Argument>,
        response: &mut W,
    ) -> HandlerResult {
        if let Some(argument) = argument {
            let value = argument::text(field.command, field.key, argument)?;
            let slot = (field.select)(&mut self.config);
            if field.clearable && value == CLEAR_SENTINEL {
                slot.clear();
            } else {
                value.clone_into(slot);
            }
            self.persist(field.key).await;
            tracing::info!(key = %field.key, "network parameter changed");

            match field.reconnect {
                Reconnect::Always(link) => self.reconnect(link).await,
                Reconnect::IfStatic if self.static_addressing_active() => {
                    self.reconnect(Link::Wifi).await;
                }
                Reconnect::IfStatic => {}
            }
        }
        let value = (field.select)(&mut self.config).clone();
        respond(response, ResponseItem::text(field.command, value));
        Ok(ExecutionResult::ExecutedCompletely)
    }

    fn static_addressing_active(&self) -> bool {
        self.peers
            .addressing
            .as_ref()
            .is_some_and(|mode| mode.is_static_active())
    }
}

//! # sensornoded: sensor node daemon
//!
//! Composition root that wires the adapters into the command engine and
//! serves commands.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Open the configuration store and restore the persisted parameters
//! - Construct the virtual peripherals and record buffers
//! - Read one JSON-encoded command per line from stdin, execute it and write
//!   the JSON-encoded reply to stdout
//! - Stop on end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use sensornode_adapter_storage_json::{InMemoryConfigStore, JsonFileConfigStore};
use sensornode_adapter_virtual::{BoundedResponse, RingLog, VirtualNode, sample_readings};
use sensornode_app::engine::CommandEngine;
use sensornode_app::ports::{ConfigStore, RealTimeClock};
use sensornode_app::restore;
use sensornode_domain::command::{Argument, Command, CommandType, ExecutionResult};
use sensornode_domain::record::SystemLogEntry;
use sensornode_domain::response::ResponseItem;

use crate::config::Config;

/// One line of output, answering one line of input.
#[derive(Debug, Serialize)]
struct Reply {
    command: CommandType,
    result: ExecutionResult,
    /// The argument after execution; carries the advanced streaming cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    argument: Option<Argument>,
    items: Vec<ResponseItem>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    match &config.storage.path {
        Some(path) => {
            let store = JsonFileConfigStore::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            run(&config, store).await
        }
        None => {
            tracing::warn!("no storage path configured, parameters will not survive a restart");
            run(&config, InMemoryConfigStore::new()).await
        }
    }
}

async fn run<S: ConfigStore>(config: &Config, store: S) -> anyhow::Result<()> {
    let device_config = restore::load_config(&store)
        .await
        .context("failed to restore configuration")?;
    let info = config.device_info()?;

    let node = VirtualNode::new(
        device_config.heartbeat,
        device_config.movement.clone(),
        &info.actuators,
        config.network.teardown_steps,
        config.network.static_ip,
    );
    let system_log = Arc::new(RingLog::new(config.buffers.system_capacity));
    let readings = Arc::new(RingLog::new(config.buffers.readings_capacity));
    system_log.push(SystemLogEntry {
        timestamp: node.clock.now(),
        message: format!("boot {}", info.firmware),
    });
    let sampler = tokio::spawn(sample_readings(
        Arc::clone(&node.clock),
        Arc::clone(&readings),
        node.telemetry.subscribe(),
    ));

    tracing::info!(mac = %info.mac, firmware = %info.firmware, "node ready");
    let mut engine = CommandEngine::new(
        device_config,
        store,
        system_log,
        readings,
        node.peers(),
        info,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read command")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut command = decode(line);
        let mut response = BoundedResponse::new(config.response.capacity);
        let result = engine.execute(&mut command, &mut response).await;

        let reply = Reply {
            command: command.command_type,
            result,
            argument: command.argument,
            items: response.into_items(),
        };
        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    sampler.abort();
    tracing::info!("shutting down");
    Ok(())
}

/// Undecodable input is executed as an unknown command, so the caller still
/// gets a bad-request reply.
fn decode(line: &str) -> Command {
    serde_json::from_str(line).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "undecodable command");
        Command::get(CommandType::Unknown)
    })
}

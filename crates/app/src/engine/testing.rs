//! In-memory fakes for engine tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sensornode_domain::command::{ActuatorId, Command, ExecutionResult};
use sensornode_domain::config::{ConfigKey, ConfigValue, DeviceConfig, MovementFlag};
use sensornode_domain::device::DeviceInfo;
use sensornode_domain::error::{NodeError, ResponseFull};
use sensornode_domain::record::{SensorReading, SystemLogEntry};
use sensornode_domain::response::ResponseItem;
use sensornode_domain::time::RtcTimestamp;

use super::CommandEngine;
use crate::ports::{
    ActuatorControl, AddressingMode, ConfigStore, MovementSensor, NodeLifecycle, Peers,
    RealTimeClock, RecordBuffer, ResponseWriter, SessionTeardown, StatusProvider,
    TelemetryScheduler, Teardown, TeardownStatus, WifiTeardown,
};

/// Polls a fake teardown reports in progress before completing.
pub(crate) const TEARDOWN_STEPS: usize = 3;

#[derive(Default)]
pub(crate) struct FakeStore {
    values: Mutex<HashMap<ConfigKey, ConfigValue>>,
    writes: Mutex<Vec<(ConfigKey, ConfigValue)>>,
    fail: AtomicBool,
}

impl FakeStore {
    pub(crate) fn with_value(self, key: ConfigKey, value: ConfigValue) -> Self {
        self.values.lock().unwrap().insert(key, value);
        self
    }

    pub(crate) fn writes(&self) -> Vec<(ConfigKey, ConfigValue)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn fail_writes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl ConfigStore for FakeStore {
    fn write(
        &self,
        key: ConfigKey,
        value: ConfigValue,
    ) -> impl Future<Output = Result<(), NodeError>> + Send {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(NodeError::Storage(Box::new(std::io::Error::other(
                "flash unavailable",
            ))))
        } else {
            self.values.lock().unwrap().insert(key, value.clone());
            self.writes.lock().unwrap().push((key, value));
            Ok(())
        };
        std::future::ready(result)
    }

    fn read(
        &self,
        key: ConfigKey,
    ) -> impl Future<Output = Result<Option<ConfigValue>, NodeError>> + Send {
        std::future::ready(Ok(self.values.lock().unwrap().get(&key).cloned()))
    }
}

pub(crate) struct VecBuffer<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for VecBuffer<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T> VecBuffer<T> {
    pub(crate) fn fill(&self, items: impl IntoIterator<Item = T>) {
        self.items.lock().unwrap().extend(items);
    }
}

impl<T: Clone> RecordBuffer for VecBuffer<T> {
    type Record = T;

    fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.lock().unwrap().get(index).cloned()
    }

    fn clear(&self) {
        self.items.lock().unwrap().clear();
    }
}

/// A response that refuses items past `capacity`.
pub(crate) struct CappedResponse {
    pub(crate) items: Vec<ResponseItem>,
    capacity: usize,
}

impl CappedResponse {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }
}

impl ResponseWriter for CappedResponse {
    fn append(&mut self, item: ResponseItem) -> Result<(), ResponseFull> {
        if self.items.len() >= self.capacity {
            return Err(ResponseFull);
        }
        self.items.push(item);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PeerCall {
    RestartTelemetry(u32),
    EnableMovement,
    DisableMovement,
    SetActuator(ActuatorId, String),
    RequestState(ActuatorId),
    ExchangeNow,
    Reset,
    SetClock(RtcTimestamp),
    CloseSession,
    DisconnectWifi,
}

/// Records every side-effecting call made by the engine.
pub(crate) struct FakePeers {
    calls: Mutex<Vec<PeerCall>>,
    polls: Arc<AtomicUsize>,
    static_active: AtomicBool,
    clock: AtomicU32,
    status: String,
    /// Shared with the engine's configuration.
    movement: MovementFlag,
    /// Value of the movement flag each time the sensor was switched.
    movement_seen: Mutex<Vec<bool>>,
}

impl Default for FakePeers {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            polls: Arc::new(AtomicUsize::new(0)),
            static_active: AtomicBool::new(true),
            clock: AtomicU32::new(0),
            status: String::new(),
            movement: MovementFlag::new(false),
            movement_seen: Mutex::new(Vec::new()),
        }
    }
}

impl FakePeers {
    pub(crate) fn calls(&self) -> Vec<PeerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Total polls across every teardown started so far.
    pub(crate) fn teardown_polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub(crate) fn set_static_active(&self, active: bool) {
        self.static_active.store(active, Ordering::SeqCst);
    }

    pub(crate) fn set_clock_value(&self, timestamp: RtcTimestamp) {
        self.clock.store(timestamp, Ordering::SeqCst);
    }

    /// Movement flag as observed by the sensor when it was switched.
    pub(crate) fn movement_seen(&self) -> Vec<bool> {
        self.movement_seen.lock().unwrap().clone()
    }

    fn record(&self, call: PeerCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn countdown(&self) -> Box<dyn Teardown> {
        Box::new(Countdown {
            remaining: TEARDOWN_STEPS,
            polls: Arc::clone(&self.polls),
        })
    }
}

struct Countdown {
    remaining: usize,
    polls: Arc<AtomicUsize>,
}

impl Teardown for Countdown {
    fn poll(&mut self) -> TeardownStatus {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.remaining == 0 {
            TeardownStatus::Complete
        } else {
            self.remaining -= 1;
            TeardownStatus::InProgress
        }
    }
}

impl TelemetryScheduler for FakePeers {
    fn restart(&self, interval_secs: u32) {
        self.record(PeerCall::RestartTelemetry(interval_secs));
    }
}

impl MovementSensor for FakePeers {
    fn enable(&self) {
        self.movement_seen.lock().unwrap().push(self.movement.get());
        self.record(PeerCall::EnableMovement);
    }

    fn disable(&self) {
        self.movement_seen.lock().unwrap().push(self.movement.get());
        self.record(PeerCall::DisableMovement);
    }
}

impl ActuatorControl for FakePeers {
    fn set(&self, id: ActuatorId, value: &str) {
        self.record(PeerCall::SetActuator(id, value.to_string()));
    }

    fn request_state(&self, id: ActuatorId) {
        self.record(PeerCall::RequestState(id));
    }
}

impl StatusProvider for FakePeers {
    fn status(&self, max_len: usize) -> String {
        self.status.chars().take(max_len).collect()
    }
}

impl NodeLifecycle for FakePeers {
    fn exchange_now(&self) {
        self.record(PeerCall::ExchangeNow);
    }

    fn reset(&self) {
        self.record(PeerCall::Reset);
    }
}

impl RealTimeClock for FakePeers {
    fn now(&self) -> RtcTimestamp {
        self.clock.load(Ordering::SeqCst)
    }

    fn set(&self, timestamp: RtcTimestamp) {
        self.clock.store(timestamp, Ordering::SeqCst);
        self.record(PeerCall::SetClock(timestamp));
    }
}

impl SessionTeardown for FakePeers {
    fn close_session(&self) -> Box<dyn Teardown> {
        self.record(PeerCall::CloseSession);
        self.countdown()
    }
}

impl WifiTeardown for FakePeers {
    fn disconnect(&self) -> Box<dyn Teardown> {
        self.record(PeerCall::DisconnectWifi);
        self.countdown()
    }
}

impl AddressingMode for FakePeers {
    fn is_static_active(&self) -> bool {
        self.static_active.load(Ordering::SeqCst)
    }
}

pub(crate) type TestEngine = CommandEngine<
    Arc<FakeStore>,
    Arc<VecBuffer<SystemLogEntry>>,
    Arc<VecBuffer<SensorReading>>,
>;

/// An engine wired to fakes, plus the response of the commands run so far.
pub(crate) struct Harness {
    pub(crate) engine: TestEngine,
    pub(crate) response: Vec<ResponseItem>,
    pub(crate) store: Arc<FakeStore>,
    pub(crate) peers: Arc<FakePeers>,
    pub(crate) system_log: Arc<VecBuffer<SystemLogEntry>>,
    pub(crate) readings: Arc<VecBuffer<SensorReading>>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::build(FakePeers::default(), true, DeviceInfo::default())
    }
}

impl Harness {
    /// No optional capability wired at all.
    pub(crate) fn without_peers() -> Self {
        Self::build(FakePeers::default(), false, DeviceInfo::default())
    }

    pub(crate) fn with_info(info: DeviceInfo) -> Self {
        Self::build(FakePeers::default(), true, info)
    }

    pub(crate) fn with_status(status: &str) -> Self {
        let peers = FakePeers {
            status: status.to_string(),
            ..FakePeers::default()
        };
        Self::build(peers, true, DeviceInfo::default())
    }

    fn build(peers: FakePeers, wired: bool, info: DeviceInfo) -> Self {
        let config = DeviceConfig::default();
        let store = Arc::new(FakeStore::default());
        let peers = Arc::new(FakePeers {
            movement: config.movement.clone(),
            ..peers
        });
        let system_log = Arc::new(VecBuffer::default());
        let readings = Arc::new(VecBuffer::default());

        let wiring = if wired {
            Peers::default()
                .with_telemetry(peers.clone())
                .with_movement(peers.clone())
                .with_actuators(peers.clone())
                .with_status(peers.clone())
                .with_lifecycle(peers.clone())
                .with_clock(peers.clone())
                .with_session(peers.clone())
                .with_wifi(peers.clone())
                .with_addressing(peers.clone())
        } else {
            Peers::default()
        };

        let engine = CommandEngine::new(
            config,
            Arc::clone(&store),
            Arc::clone(&system_log),
            Arc::clone(&readings),
            wiring,
            info,
        );

        Self {
            engine,
            response: Vec::new(),
            store,
            peers,
            system_log,
            readings,
        }
    }

    pub(crate) async fn run(&mut self, command: &mut Command) -> ExecutionResult {
        self.engine.execute(command, &mut self.response).await
    }

    pub(crate) fn take_response(&mut self) -> Vec<ResponseItem> {
        std::mem::take(&mut self.response)
    }

    pub(crate) fn engine_config_mut(&mut self) -> &mut DeviceConfig {
        &mut self.engine.config
    }
}

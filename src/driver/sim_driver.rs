//! In-memory radio driver
//!
//! Backs the daemon when no firmware is attached and serves as the test
//! double for the controller. Every call is recorded so tests can assert
//! that validation failures never reach the radio.

use std::{
    collections::{HashSet, VecDeque},
    net::Ipv4Addr,
    path::Path,
    sync::Arc,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    core::{
        error::{DriverError, DriverResult},
        types::{
            ApConfig, AuthMode, IpInfo, MacAddr, PhyMode, RadioMode, Role, SSID_CAPACITY,
            ScanRecord, StationConfig, StationStatus, fill_buffer,
        },
    },
    driver::{RadioDriver, ScanCallback, ScanOutcome},
};

/// Number of most recent driver calls kept in the call log
pub const CALL_LOG_CAPACITY: usize = 256;

const DEFAULT_SCAN_DELAY: Duration = Duration::from_millis(5);
const DEFAULT_AP_SSID: &[u8] = b"wlan-netif-ap";
const DEFAULT_STATION_MAC: MacAddr = MacAddr([0x5c, 0xcf, 0x7f, 0x00, 0x00, 0x01]);
const DEFAULT_AP_MAC: MacAddr = MacAddr([0x5e, 0xcf, 0x7f, 0x00, 0x00, 0x01]);
const AP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);
const AP_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// Driver entry points, as recorded in the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverOp {
    Mode,
    SetMode,
    PhyMode,
    SetPhyMode,
    StationStatus,
    AssociatedClients,
    Mac,
    SetMac,
    IpInfo,
    StationConfig,
    SetStationConfig,
    ApConfig,
    SetApConfig,
    StationConnect,
    StationDisconnect,
    RequestScan,
}

impl DriverOp {
    /// Whether the call changes radio state
    pub fn is_write(self) -> bool {
        matches!(
            self,
            DriverOp::SetMode
                | DriverOp::SetPhyMode
                | DriverOp::SetMac
                | DriverOp::SetStationConfig
                | DriverOp::SetApConfig
                | DriverOp::StationConnect
                | DriverOp::StationDisconnect
        )
    }
}

/// How the simulated radio answers a scan request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanBehavior {
    /// Deliver the configured networks after `delay`
    Complete { delay: Duration },
    /// Report a firmware failure through the callback
    Fail,
    /// Keep the callback until [`SimulatedRadio::fire_stalled_scan`]
    Stall,
    /// Drop the callback without ever invoking it
    Abandon,
}

impl Default for ScanBehavior {
    fn default() -> Self {
        ScanBehavior::Complete {
            delay: DEFAULT_SCAN_DELAY,
        }
    }
}

/// A network in the simulated environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimNetwork {
    pub ssid: String,
    pub bssid: MacAddr,
    pub channel: u8,
    pub rssi: i8,
    #[serde(default)]
    pub auth_mode: AuthMode,
    #[serde(default)]
    pub hidden: bool,
}

impl From<SimNetwork> for ScanRecord {
    /// SSIDs longer than [`SSID_CAPACITY`] are cut, as the radio would report them
    fn from(network: SimNetwork) -> Self {
        let mut ssid = network.ssid.into_bytes();
        ssid.truncate(SSID_CAPACITY);
        ScanRecord {
            ssid,
            bssid: network.bssid,
            channel: network.channel,
            rssi: network.rssi,
            auth_mode: network.auth_mode,
            hidden: network.hidden,
        }
    }
}

/// Radio environment loaded from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEnvironment {
    #[serde(default)]
    pub networks: Vec<SimNetwork>,
    #[serde(default)]
    pub station_mac: Option<MacAddr>,
    #[serde(default)]
    pub ap_mac: Option<MacAddr>,
    #[serde(default)]
    pub scan_delay_ms: Option<u64>,
}

impl SimEnvironment {
    /// Read an environment description from disk
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let env: Self = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(network) = env.networks.iter().find(|n| n.ssid.len() > SSID_CAPACITY) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "SSID {:?} is {} bytes, at most {SSID_CAPACITY} allowed",
                    network.ssid,
                    network.ssid.len()
                ),
            ));
        }
        Ok(env)
    }
}

/// Internal state for the simulated radio
struct SimState {
    mode: RadioMode,
    phy_mode: PhyMode,
    station_status: StationStatus,
    associated_clients: u8,
    macs: [MacAddr; 2],
    ip: [IpInfo; 2],
    station_config: StationConfig,
    ap_config: ApConfig,
    networks: Vec<ScanRecord>,
    scan_behavior: ScanBehavior,
    stalled: Vec<ScanCallback>,
    failing: HashSet<DriverOp>,
    calls: VecDeque<DriverOp>,
}

impl SimState {
    fn record(&mut self, op: DriverOp) -> DriverResult<()> {
        if self.calls.len() == CALL_LOG_CAPACITY {
            self.calls.pop_front();
        }
        self.calls.push_back(op);
        if self.failing.contains(&op) {
            debug!(?op, "Simulated driver failure");
            return Err(DriverError::new(-1, format!("simulated {op:?} failure")));
        }
        Ok(())
    }
}

fn slot(role: Role) -> usize {
    match role {
        Role::Station => 0,
        Role::AccessPoint => 1,
    }
}

/// Simulated single-radio driver
#[derive(Clone)]
pub struct SimulatedRadio {
    inner: Arc<Mutex<SimState>>,
}

impl SimulatedRadio {
    /// Create a radio in station mode with an empty environment
    pub fn new() -> Self {
        let mut ap_config = ApConfig::default();
        ap_config.ssid_len = fill_buffer(&mut ap_config.ssid, DEFAULT_AP_SSID, usize::MAX) as u8;

        Self {
            inner: Arc::new(Mutex::new(SimState {
                mode: RadioMode::STATION,
                phy_mode: PhyMode::default(),
                station_status: StationStatus::Idle,
                associated_clients: 0,
                macs: [DEFAULT_STATION_MAC, DEFAULT_AP_MAC],
                ip: [
                    IpInfo::default(),
                    IpInfo {
                        ip: AP_ADDRESS,
                        netmask: AP_NETMASK,
                        gateway: AP_ADDRESS,
                    },
                ],
                station_config: StationConfig::default(),
                ap_config,
                networks: Vec::new(),
                scan_behavior: ScanBehavior::default(),
                stalled: Vec::new(),
                failing: HashSet::new(),
                calls: VecDeque::with_capacity(CALL_LOG_CAPACITY),
            })),
        }
    }

    /// Create a radio populated from an environment description
    pub async fn from_environment(env: SimEnvironment) -> Self {
        let radio = Self::new();
        {
            let mut state = radio.inner.lock().await;
            state.networks = env.networks.into_iter().map(ScanRecord::from).collect();
            if let Some(mac) = env.station_mac {
                state.macs[slot(Role::Station)] = mac;
            }
            if let Some(mac) = env.ap_mac {
                state.macs[slot(Role::AccessPoint)] = mac;
            }
            if let Some(ms) = env.scan_delay_ms {
                state.scan_behavior = ScanBehavior::Complete {
                    delay: Duration::from_millis(ms),
                };
            }
        }
        radio
    }

    /// Configure the networks reported by scans
    pub async fn set_networks(&self, networks: Vec<ScanRecord>) {
        self.inner.lock().await.networks = networks;
    }

    pub async fn set_scan_behavior(&self, behavior: ScanBehavior) {
        self.inner.lock().await.scan_behavior = behavior;
    }

    /// Number of scan callbacks held back by [`ScanBehavior::Stall`]
    pub async fn stalled_scans(&self) -> usize {
        self.inner.lock().await.stalled.len()
    }

    /// Deliver the oldest held-back scan callback
    ///
    /// Returns false if nothing was stalled.
    pub async fn fire_stalled_scan(&self, outcome: ScanOutcome) -> bool {
        let callback = {
            let mut state = self.inner.lock().await;
            if state.stalled.is_empty() {
                None
            } else {
                Some(state.stalled.remove(0))
            }
        };

        match callback {
            Some(callback) => {
                callback(outcome);
                true
            }
            None => false,
        }
    }

    /// Make every call to `op` fail
    pub async fn set_failure(&self, op: DriverOp, should_fail: bool) {
        let mut state = self.inner.lock().await;
        if should_fail {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    pub async fn set_associated_clients(&self, count: u8) {
        self.inner.lock().await.associated_clients = count;
    }

    /// Simulate the station obtaining an address
    pub async fn complete_connection(&self, ip: Ipv4Addr) {
        let mut state = self.inner.lock().await;
        state.station_status = StationStatus::GotIp;
        state.ip[slot(Role::Station)] = IpInfo {
            ip,
            netmask: AP_NETMASK,
            gateway: Ipv4Addr::new(ip.octets()[0], ip.octets()[1], ip.octets()[2], 1),
        };
    }

    /// Simulate a failed association
    pub async fn fail_connection(&self, status: StationStatus) {
        let mut state = self.inner.lock().await;
        state.station_status = status;
        state.ip[slot(Role::Station)] = IpInfo::default();
    }

    /// The most recent driver calls, oldest first, at most [`CALL_LOG_CAPACITY`]
    pub async fn calls(&self) -> Vec<DriverOp> {
        self.inner.lock().await.calls.iter().copied().collect()
    }

    pub async fn clear_calls(&self) {
        self.inner.lock().await.calls.clear();
    }
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioDriver for SimulatedRadio {
    async fn mode(&self) -> DriverResult<RadioMode> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::Mode)?;
        Ok(state.mode)
    }

    async fn set_mode(&self, mode: RadioMode) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::SetMode)?;
        state.mode = mode;
        Ok(())
    }

    async fn phy_mode(&self) -> DriverResult<PhyMode> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::PhyMode)?;
        Ok(state.phy_mode)
    }

    async fn set_phy_mode(&self, mode: PhyMode) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::SetPhyMode)?;
        state.phy_mode = mode;
        Ok(())
    }

    async fn station_status(&self) -> DriverResult<StationStatus> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::StationStatus)?;
        Ok(state.station_status)
    }

    async fn associated_clients(&self) -> DriverResult<u8> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::AssociatedClients)?;
        Ok(state.associated_clients)
    }

    async fn mac(&self, role: Role) -> DriverResult<MacAddr> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::Mac)?;
        Ok(state.macs[slot(role)])
    }

    async fn set_mac(&self, role: Role, mac: MacAddr) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::SetMac)?;
        state.macs[slot(role)] = mac;
        Ok(())
    }

    async fn ip_info(&self, role: Role) -> DriverResult<IpInfo> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::IpInfo)?;
        Ok(state.ip[slot(role)])
    }

    async fn station_config(&self) -> DriverResult<StationConfig> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::StationConfig)?;
        Ok(state.station_config)
    }

    async fn set_station_config(&self, config: &StationConfig) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::SetStationConfig)?;
        state.station_config = *config;
        Ok(())
    }

    async fn ap_config(&self) -> DriverResult<ApConfig> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::ApConfig)?;
        Ok(state.ap_config)
    }

    async fn set_ap_config(&self, config: &ApConfig) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::SetApConfig)?;
        state.ap_config = *config;
        Ok(())
    }

    async fn station_connect(&self) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::StationConnect)?;
        state.station_status = if state.station_config.ssid_bytes().is_empty() {
            StationStatus::NoApFound
        } else {
            StationStatus::Connecting
        };
        Ok(())
    }

    async fn station_disconnect(&self) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::StationDisconnect)?;
        state.station_status = StationStatus::Idle;
        state.ip[slot(Role::Station)] = IpInfo::default();
        Ok(())
    }

    async fn request_scan(&self, on_complete: ScanCallback) -> DriverResult<()> {
        let mut state = self.inner.lock().await;
        state.record(DriverOp::RequestScan)?;

        let behavior = state.scan_behavior;
        match behavior {
            ScanBehavior::Complete { delay } => {
                let networks = state.networks.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    debug!("Simulated scan complete, {} networks", networks.len());
                    on_complete(Ok(networks));
                });
            }
            ScanBehavior::Fail => {
                tokio::spawn(async move {
                    on_complete(Err(DriverError::new(1, "simulated scan failure")));
                });
            }
            ScanBehavior::Stall => state.stalled.push(on_complete),
            ScanBehavior::Abandon => drop(on_complete),
        }

        Ok(())
    }
}

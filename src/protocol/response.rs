//! Response message types

use serde::{Deserialize, Serialize};

use crate::core::types::{
    AuthMode, ConfigValue, IfConfig, InterfaceStatus, MacAddr, PhyMode, ScanRecord,
};

/// Response messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    /// Scan results response
    ScanResults(ScanResultsResponse),

    /// Interface enabled state
    Active(ActiveResponse),

    /// Interface status
    Status(StatusResponse),

    /// Link state
    IsConnected(IsConnectedResponse),

    /// Hardware address
    Mac(MacResponse),

    /// Value of a config query
    Config(ConfigResponse),

    /// IPv4 addressing
    Ifconfig(IfconfigResponse),

    /// Radio-wide operating or PHY mode
    WifiMode(WifiModeResponse),

    PhyMode(PhyModeResponse),

    /// Acknowledgement without payload
    Ack(AckResponse),
}

/// Network found by a scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkEntry {
    /// SSID, invalid UTF-8 replaced
    pub ssid: String,
    pub bssid: MacAddr,
    pub channel: u8,
    pub rssi: i8,
    pub auth_mode: AuthMode,
    pub hidden: bool,
}

impl From<&ScanRecord> for NetworkEntry {
    fn from(record: &ScanRecord) -> Self {
        Self {
            ssid: record.ssid_lossy(),
            bssid: record.bssid,
            channel: record.channel,
            rssi: record.rssi,
            auth_mode: record.auth_mode,
            hidden: record.hidden,
        }
    }
}

/// Response for scan request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanResultsResponse {
    pub status: String,
    pub networks: Vec<NetworkEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveResponse {
    pub status: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub state: InterfaceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IsConnectedResponse {
    pub status: String,
    pub connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacResponse {
    pub status: String,
    pub mac: MacAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigResponse {
    pub status: String,
    pub value: ConfigValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IfconfigResponse {
    pub status: String,
    #[serde(flatten)]
    pub config: IfConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiModeResponse {
    pub status: String,
    pub wifi_mode: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhyModeResponse {
    pub status: String,
    pub phy_mode: PhyMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckResponse {
    pub status: String,
}

impl ScanResultsResponse {
    pub fn ok(records: &[ScanRecord]) -> Self {
        Self {
            status: "ok".to_string(),
            networks: records.iter().map(NetworkEntry::from).collect(),
        }
    }
}

impl ActiveResponse {
    pub fn ok(active: bool) -> Self {
        Self {
            status: "ok".to_string(),
            active,
        }
    }
}

impl StatusResponse {
    pub fn ok(state: InterfaceStatus) -> Self {
        Self {
            status: "ok".to_string(),
            state,
        }
    }
}

impl IsConnectedResponse {
    pub fn ok(connected: bool) -> Self {
        Self {
            status: "ok".to_string(),
            connected,
        }
    }
}

impl MacResponse {
    pub fn ok(mac: MacAddr) -> Self {
        Self {
            status: "ok".to_string(),
            mac,
        }
    }
}

impl ConfigResponse {
    pub fn ok(value: ConfigValue) -> Self {
        Self {
            status: "ok".to_string(),
            value,
        }
    }
}

impl IfconfigResponse {
    pub fn ok(config: IfConfig) -> Self {
        Self {
            status: "ok".to_string(),
            config,
        }
    }
}

impl WifiModeResponse {
    pub fn ok(wifi_mode: u8) -> Self {
        Self {
            status: "ok".to_string(),
            wifi_mode,
        }
    }
}

impl PhyModeResponse {
    pub fn ok(phy_mode: PhyMode) -> Self {
        Self {
            status: "ok".to_string(),
            phy_mode,
        }
    }
}

impl AckResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

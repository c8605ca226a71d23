//! Request message types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{
    dispatcher::ConfigCall,
    error::WlanResult,
    types::{ConfigValue, PhyMode, decode_hw_address},
};

/// Request messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Query or toggle an interface
    Active(ActiveParams),

    /// Join an access point through the station interface
    Connect(ConnectParams),

    Disconnect(IfaceParams),

    /// Interface status
    Status(IfaceParams),

    /// Blocking scan for networks
    Scan(IfaceParams),

    IsConnected(IfaceParams),

    /// Query or set the hardware address
    Mac(MacParams),

    /// Read one or write several configuration parameters
    Config(ConfigParams),

    Ifconfig(IfaceParams),

    /// Query or set the raw radio operating mode
    WifiMode(WifiModeParams),

    PhyMode(PhyModeParams),
}

/// Parameters naming only the interface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IfaceParams {
    /// Interface index (0 = station, 1 = access point)
    pub iface: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveParams {
    pub iface: i64,
    /// Absent for a query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Parameters for connect request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectParams {
    pub iface: i64,

    /// Network SSID
    pub ssid: String,

    /// Passphrase, empty for open networks
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacParams {
    pub iface: i64,

    /// Hex encoded address, separators optional; absent for a query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

impl MacParams {
    /// Decode the hex address into raw bytes
    ///
    /// The length is not checked here so that the interface can report it.
    pub fn decode_mac(&self) -> Result<Option<Vec<u8>>, String> {
        let Some(mac) = &self.mac else {
            return Ok(None);
        };
        decode_hw_address(mac).map(Some)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigParams {
    pub iface: i64,

    /// Parameter to read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,

    /// Parameters to write
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set: BTreeMap<String, ConfigValue>,
}

impl ConfigParams {
    pub fn to_call(&self) -> WlanResult<ConfigCall> {
        ConfigCall::new(
            self.get.clone(),
            self.set
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiModeParams {
    /// Raw mode bits; absent for a query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhyModeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PhyMode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::WlanError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_scan_serialization() {
        let request = Request::Scan(IfaceParams { iface: 0 });
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"method":"scan","params":{"iface":0}}"#);

        let deserialized: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_request_active_query_and_set() {
        let query: Request =
            serde_json::from_str(r#"{"method":"active","params":{"iface":1}}"#).unwrap();
        assert_eq!(
            query,
            Request::Active(ActiveParams {
                iface: 1,
                enabled: None
            })
        );

        let set: Request =
            serde_json::from_str(r#"{"method":"active","params":{"iface":1,"enabled":true}}"#)
                .unwrap();
        assert_eq!(
            set,
            Request::Active(ActiveParams {
                iface: 1,
                enabled: Some(true)
            })
        );
    }

    #[test]
    fn test_request_connect_serialization() {
        let request = Request::Connect(ConnectParams {
            iface: 0,
            ssid: "MyNetwork".to_string(),
            password: "secret".to_string(),
        });

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""method":"connect""#));
        assert!(json.contains(r#""ssid":"MyNetwork""#));

        let deserialized: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_request_is_connected_method_name() {
        let json = serde_json::to_string(&Request::IsConnected(IfaceParams { iface: 0 })).unwrap();
        assert_eq!(json, r#"{"method":"is_connected","params":{"iface":0}}"#);
    }

    #[test]
    fn test_request_config_set() {
        let json = r#"{"method":"config","params":{"iface":1,
            "set":{"essid":"net1","channel":6,"hidden":true}}}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        let Request::Config(params) = request else {
            panic!("expected config request");
        };

        assert_eq!(
            params.to_call().unwrap(),
            ConfigCall::Set(vec![
                ("channel".into(), ConfigValue::Int(6)),
                ("essid".into(), ConfigValue::Str("net1".into())),
                ("hidden".into(), ConfigValue::Bool(true)),
            ])
        );
    }

    #[test]
    fn test_request_config_rejects_mixed_call() {
        let params = ConfigParams {
            iface: 1,
            get: Some("essid".into()),
            set: BTreeMap::from([("channel".to_string(), ConfigValue::Int(3))]),
        };
        assert!(matches!(
            params.to_call(),
            Err(WlanError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_request_phy_mode() {
        let request: Request =
            serde_json::from_str(r#"{"method":"phy_mode","params":{"mode":"11g"}}"#).unwrap();
        assert_eq!(
            request,
            Request::PhyMode(PhyModeParams {
                mode: Some(PhyMode::Ieee80211g)
            })
        );
    }

    #[test]
    fn test_mac_params_decode() {
        let params = MacParams {
            iface: 0,
            mac: Some("02:11:22:33:44:55".to_string()),
        };
        assert_eq!(
            params.decode_mac().unwrap(),
            Some(vec![0x02, 0x11, 0x22, 0x33, 0x44, 0x55])
        );

        let short = MacParams {
            iface: 0,
            mac: Some("0211223344".to_string()),
        };
        assert_eq!(short.decode_mac().unwrap().map(|b| b.len()), Some(5));

        let query = MacParams { iface: 0, mac: None };
        assert_eq!(query.decode_mac().unwrap(), None);
    }

    #[test]
    fn test_mac_params_decode_invalid_hex() {
        let params = MacParams {
            iface: 0,
            mac: Some("zz:11:22:33:44:55".to_string()),
        };
        assert!(params.decode_mac().is_err());
    }

    #[test]
    fn test_mac_params_decode_matches_mac_parse() {
        use crate::core::types::MacAddr;

        for text in ["02-11-22-33-44-55", "02:11:22:33:44:55", "021122334455"] {
            let params = MacParams {
                iface: 1,
                mac: Some(text.to_string()),
            };
            let parsed: MacAddr = text.parse().unwrap();
            assert_eq!(params.decode_mac().unwrap(), Some(parsed.0.to_vec()));
        }

        let bad = MacParams {
            iface: 1,
            mac: Some("02:11:2".to_string()),
        };
        assert_eq!(
            bad.decode_mac().unwrap_err(),
            "02:11:2".parse::<MacAddr>().unwrap_err()
        );
    }
}

//! Domain types for the WLAN interface controller

use std::{fmt, net::Ipv4Addr, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Interface index of the station interface
pub const STA_IF: u8 = 0;
/// Interface index of the soft access-point interface
pub const AP_IF: u8 = 1;

/// Maximum SSID length in bytes
pub const SSID_CAPACITY: usize = 32;
/// Capacity of the password buffer in both configuration records
pub const PASSWORD_CAPACITY: usize = 64;

/// Logical interface role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    Station = STA_IF,
    AccessPoint = AP_IF,
}

impl Role {
    /// Radio mode bit that enables this role
    pub fn mode_bit(self) -> RadioMode {
        match self {
            Role::Station => RadioMode::STATION,
            Role::AccessPoint => RadioMode::ACCESS_POINT,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Station => f.write_str("STA"),
            Role::AccessPoint => f.write_str("AP"),
        }
    }
}

/// Radio operating mode as a bitmask over the two roles
///
/// Numeric values match the firmware opmode: 0 = off, 1 = station,
/// 2 = soft-AP, 3 = both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadioMode(u8);

impl RadioMode {
    pub const OFF: RadioMode = RadioMode(0);
    pub const STATION: RadioMode = RadioMode(0x1);
    pub const ACCESS_POINT: RadioMode = RadioMode(0x2);
    pub const STATION_AND_ACCESS_POINT: RadioMode = RadioMode(0x3);

    /// Build a mode from raw bits, dropping anything outside the two role bits
    pub const fn from_bits_truncate(bits: u8) -> Self {
        RadioMode(bits & Self::STATION_AND_ACCESS_POINT.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: RadioMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn has_role(self, role: Role) -> bool {
        self.contains(role.mode_bit())
    }

    /// Copy of this mode with `role`'s bit set or cleared
    pub fn with_role(self, role: Role, enabled: bool) -> Self {
        let bit = role.mode_bit().0;
        if enabled {
            RadioMode(self.0 | bit)
        } else {
            RadioMode(self.0 & !bit)
        }
    }
}

impl TryFrom<u8> for RadioMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        if value & !Self::STATION_AND_ACCESS_POINT.0 != 0 {
            return Err(());
        }
        Ok(RadioMode(value))
    }
}

impl From<RadioMode> for u8 {
    fn from(mode: RadioMode) -> Self {
        mode.0
    }
}

/// Station connection status as reported by the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StationStatus {
    Idle = 0,
    Connecting = 1,
    WrongPassword = 2,
    NoApFound = 3,
    ConnectFailed = 4,
    GotIp = 5,
}

impl TryFrom<u8> for StationStatus {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0 => Ok(StationStatus::Idle),
            1 => Ok(StationStatus::Connecting),
            2 => Ok(StationStatus::WrongPassword),
            3 => Ok(StationStatus::NoApFound),
            4 => Ok(StationStatus::ConnectFailed),
            5 => Ok(StationStatus::GotIp),
            _ => Err(()),
        }
    }
}

impl From<StationStatus> for u8 {
    fn from(status: StationStatus) -> Self {
        status as u8
    }
}

/// Per-interface status
///
/// The access point has no discrete connection status and reports
/// `NotApplicable` instead of borrowing a station value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceStatus {
    Station(StationStatus),
    NotApplicable,
}

/// Authentication mode of a network or of the soft-AP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AuthMode {
    #[default]
    Open = 0,
    Wep = 1,
    WpaPsk = 2,
    Wpa2Psk = 3,
    WpaWpa2Psk = 4,
}

impl TryFrom<u8> for AuthMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            0 => Ok(AuthMode::Open),
            1 => Ok(AuthMode::Wep),
            2 => Ok(AuthMode::WpaPsk),
            3 => Ok(AuthMode::Wpa2Psk),
            4 => Ok(AuthMode::WpaWpa2Psk),
            _ => Err(()),
        }
    }
}

impl From<AuthMode> for u8 {
    fn from(mode: AuthMode) -> Self {
        mode as u8
    }
}

/// 802.11 PHY mode of the radio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PhyMode {
    #[serde(rename = "11b")]
    Ieee80211b = 1,
    #[serde(rename = "11g")]
    Ieee80211g = 2,
    #[default]
    #[serde(rename = "11n")]
    Ieee80211n = 3,
}

impl TryFrom<u8> for PhyMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            1 => Ok(PhyMode::Ieee80211b),
            2 => Ok(PhyMode::Ieee80211g),
            3 => Ok(PhyMode::Ieee80211n),
            _ => Err(()),
        }
    }
}

impl From<PhyMode> for u8 {
    fn from(mode: PhyMode) -> Self {
        mode as u8
    }
}

/// 6-byte hardware address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const LEN: usize = 6;
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Decode a hex hardware address with optional `:` or `-` separators
///
/// Any number of bytes is accepted; callers check the length.
pub fn decode_hw_address(s: &str) -> Result<Vec<u8>, String> {
    let digits: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
    hex::decode(&digits).map_err(|e| format!("invalid MAC address {s:?}: {e}"))
}

impl FromStr for MacAddr {
    type Err = String;

    /// Parses `aa:bb:cc:dd:ee:ff`, `aa-bb-..` or plain 12-digit hex
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hw_address(s)?;
        let octets: [u8; 6] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("MAC address must be 6 bytes, got {}", b.len()))?;
        Ok(MacAddr(octets))
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }
}

impl Serialize for MacAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One network observed by a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Raw SSID bytes (0..=32, not necessarily UTF-8)
    pub ssid: Vec<u8>,
    pub bssid: MacAddr,
    pub channel: u8,
    /// Signal strength in dBm
    pub rssi: i8,
    pub auth_mode: AuthMode,
    pub hidden: bool,
}

impl ScanRecord {
    /// SSID decoded for display, invalid UTF-8 replaced
    pub fn ssid_lossy(&self) -> String {
        String::from_utf8_lossy(&self.ssid).into_owned()
    }
}

/// Station configuration record as stored by the radio
///
/// Both buffers are zero padded; no explicit length is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationConfig {
    pub ssid: [u8; SSID_CAPACITY],
    pub password: [u8; PASSWORD_CAPACITY],
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            ssid: [0; SSID_CAPACITY],
            password: [0; PASSWORD_CAPACITY],
        }
    }
}

impl StationConfig {
    /// SSID bytes up to the first zero
    pub fn ssid_bytes(&self) -> &[u8] {
        until_nul(&self.ssid)
    }

    pub fn password_bytes(&self) -> &[u8] {
        until_nul(&self.password)
    }
}

/// Soft access-point configuration record as stored by the radio
///
/// The SSID is not nul-terminated and carries its own length; the password
/// is nul-terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApConfig {
    pub ssid: [u8; SSID_CAPACITY],
    pub ssid_len: u8,
    pub password: [u8; PASSWORD_CAPACITY],
    pub channel: u8,
    pub auth_mode: AuthMode,
    pub ssid_hidden: bool,
    pub max_connection: u8,
    pub beacon_interval: u16,
}

impl Default for ApConfig {
    fn default() -> Self {
        Self {
            ssid: [0; SSID_CAPACITY],
            ssid_len: 0,
            password: [0; PASSWORD_CAPACITY],
            channel: 1,
            auth_mode: AuthMode::Open,
            ssid_hidden: false,
            max_connection: 4,
            beacon_interval: 100,
        }
    }
}

impl ApConfig {
    pub fn ssid_bytes(&self) -> &[u8] {
        let len = usize::from(self.ssid_len).min(SSID_CAPACITY);
        &self.ssid[..len]
    }

    pub fn password_bytes(&self) -> &[u8] {
        until_nul(&self.password)
    }
}

/// Configuration record tagged by the role it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRecord {
    Station(StationConfig),
    AccessPoint(ApConfig),
}

/// Raw IPv4 information for one interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInfo {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl Default for IpInfo {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            netmask: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
        }
    }
}

/// Formatted interface addressing, as reported by `ifconfig`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfConfig {
    pub ip: String,
    pub netmask: String,
    pub gateway: String,
    /// Always empty, DNS is not tracked per interface
    pub dns: String,
}

impl From<IpInfo> for IfConfig {
    fn from(info: IpInfo) -> Self {
        Self {
            ip: info.ip.to_string(),
            netmask: info.netmask.to_string(),
            gateway: info.gateway.to_string(),
            dns: String::new(),
        }
    }
}

/// Dynamically typed configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

/// Session identifier for transport connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Copy `src` into a zeroed fixed buffer, truncating to `limit` bytes
pub(crate) fn fill_buffer<const N: usize>(buf: &mut [u8; N], src: &[u8], limit: usize) -> usize {
    let len = src.len().min(limit).min(N);
    buf.fill(0);
    buf[..len].copy_from_slice(&src[..len]);
    len
}

fn until_nul(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
    &buf[..end]
}

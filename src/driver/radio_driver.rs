//! Radio driver trait definition

use trait_variant::make;

use crate::core::{
    error::DriverResult,
    types::{
        ApConfig, IpInfo, MacAddr, PhyMode, RadioMode, Role, ScanRecord, StationConfig,
        StationStatus,
    },
};

/// What the radio delivers when a scan finishes
pub type ScanOutcome = DriverResult<Vec<ScanRecord>>;

/// Completion handed to [`RadioDriver::request_scan`]
///
/// The driver invokes it at most once, from any thread or task, at an
/// arbitrary point after `request_scan` has returned.
pub type ScanCallback = Box<dyn FnOnce(ScanOutcome) + Send + 'static>;

/// Abstraction over the radio firmware
///
/// The controller trusts every call to report success or failure honestly
/// and never retries. Implementations must be cheap to call concurrently;
/// ordering of read-modify-write sequences is the controller's concern.
#[make(Send)]
pub trait RadioDriver: Send + Sync + 'static {
    /// Current operating mode
    async fn mode(&self) -> DriverResult<RadioMode>;

    /// Replace the operating mode as a whole
    async fn set_mode(&self, mode: RadioMode) -> DriverResult<()>;

    async fn phy_mode(&self) -> DriverResult<PhyMode>;

    async fn set_phy_mode(&self, mode: PhyMode) -> DriverResult<()>;

    /// Connection status of the station interface
    async fn station_status(&self) -> DriverResult<StationStatus>;

    /// Number of clients associated with the soft-AP
    async fn associated_clients(&self) -> DriverResult<u8>;

    async fn mac(&self, role: Role) -> DriverResult<MacAddr>;

    async fn set_mac(&self, role: Role, mac: MacAddr) -> DriverResult<()>;

    async fn ip_info(&self, role: Role) -> DriverResult<IpInfo>;

    async fn station_config(&self) -> DriverResult<StationConfig>;

    async fn set_station_config(&self, config: &StationConfig) -> DriverResult<()>;

    async fn ap_config(&self) -> DriverResult<ApConfig>;

    async fn set_ap_config(&self, config: &ApConfig) -> DriverResult<()>;

    /// Start connecting the station with its stored configuration
    async fn station_connect(&self) -> DriverResult<()>;

    async fn station_disconnect(&self) -> DriverResult<()>;

    /// Issue a scan request
    ///
    /// Returning `Ok` only means the request was accepted; results arrive
    /// through `on_complete`.
    async fn request_scan(&self, on_complete: ScanCallback) -> DriverResult<()>;
}

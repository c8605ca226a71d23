//! WLAN controller facade

use std::{sync::Arc, time::Duration};

use crate::{
    core::{
        address::AddressAccessor,
        connector::StationConnector,
        dispatcher::{ConfigCall, ConfigDispatcher},
        error::WlanResult,
        mode::ModeAccessor,
        registry::{self, InterfaceHandle},
        scanner::ScanSynchronizer,
        types::{
            ConfigValue, IfConfig, InterfaceStatus, MacAddr, PhyMode, RadioMode, Role, ScanRecord,
        },
    },
    driver::RadioDriver,
};

/// Controller for one radio and its two logical interfaces
///
/// Orchestrates all components (mode, scan, config, connect, address) over
/// a single shared driver.
pub struct WlanService<D: RadioDriver> {
    pub modes: ModeAccessor<D>,
    pub scanner: ScanSynchronizer<D>,
    pub dispatcher: ConfigDispatcher<D>,
    pub connector: StationConnector<D>,
    pub addresses: AddressAccessor<D>,
}

impl<D: RadioDriver> WlanService<D> {
    /// Create a controller whose scans give up after `scan_timeout`
    pub fn new(driver: Arc<D>, scan_timeout: Duration) -> Self {
        Self {
            modes: ModeAccessor::new(driver.clone()),
            scanner: ScanSynchronizer::new(driver.clone(), scan_timeout),
            dispatcher: ConfigDispatcher::new(driver.clone()),
            connector: StationConnector::new(driver.clone()),
            addresses: AddressAccessor::new(driver),
        }
    }

    /// Interface by index (0 = station, 1 = access point)
    pub fn interface(&self, index: i64) -> WlanResult<WlanInterface<'_, D>> {
        Ok(WlanInterface {
            service: self,
            handle: registry::resolve(index)?,
        })
    }

    /// Station interface
    pub fn station(&self) -> WlanInterface<'_, D> {
        WlanInterface {
            service: self,
            handle: registry::resolve_default(),
        }
    }

    pub fn access_point(&self) -> WlanInterface<'_, D> {
        WlanInterface {
            service: self,
            handle: registry::handle_for(Role::AccessPoint),
        }
    }

    pub async fn wifi_mode(&self) -> WlanResult<RadioMode> {
        self.modes.wifi_mode().await
    }

    pub async fn set_wifi_mode(&self, mode: RadioMode) -> WlanResult<()> {
        self.modes.set_wifi_mode(mode).await
    }

    pub async fn phy_mode(&self) -> WlanResult<PhyMode> {
        self.modes.phy_mode().await
    }

    pub async fn set_phy_mode(&self, mode: PhyMode) -> WlanResult<()> {
        self.modes.set_phy_mode(mode).await
    }
}

/// A resolved interface bound to its controller
pub struct WlanInterface<'a, D: RadioDriver> {
    service: &'a WlanService<D>,
    handle: &'static InterfaceHandle,
}

impl<D: RadioDriver> WlanInterface<'_, D> {
    pub fn role(&self) -> Role {
        self.handle.role()
    }

    pub fn handle(&self) -> &'static InterfaceHandle {
        self.handle
    }

    pub async fn is_active(&self) -> WlanResult<bool> {
        self.service.modes.is_active(self.handle).await
    }

    pub async fn set_active(&self, enabled: bool) -> WlanResult<()> {
        self.service.modes.set_active(self.handle, enabled).await
    }

    pub async fn connect(&self, ssid: &[u8], password: &[u8]) -> WlanResult<()> {
        self.service
            .connector
            .connect(self.handle, ssid, password)
            .await
    }

    pub async fn disconnect(&self) -> WlanResult<()> {
        self.service.connector.disconnect(self.handle).await
    }

    pub async fn status(&self) -> WlanResult<InterfaceStatus> {
        self.service.modes.status(self.handle).await
    }

    /// Scan for networks; available from either interface while the station
    /// role is enabled
    pub async fn scan(&self) -> WlanResult<Vec<ScanRecord>> {
        self.service.scanner.scan().await
    }

    pub async fn is_connected(&self) -> WlanResult<bool> {
        self.service.modes.is_connected(self.handle).await
    }

    pub async fn mac(&self) -> WlanResult<MacAddr> {
        self.service.addresses.mac(self.handle).await
    }

    pub async fn set_mac(&self, bytes: &[u8]) -> WlanResult<()> {
        self.service.addresses.set_mac(self.handle, bytes).await
    }

    pub async fn config(&self, call: ConfigCall) -> WlanResult<Option<ConfigValue>> {
        self.service.dispatcher.config(self.handle, call).await
    }

    pub async fn ifconfig(&self) -> WlanResult<IfConfig> {
        self.service.addresses.ifconfig(self.handle).await
    }
}

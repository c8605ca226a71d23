//! Hardware address and IPv4 reporting

use std::sync::Arc;

use tracing::info;

use crate::{
    core::{
        error::{DriverResultExt, WlanError, WlanResult},
        registry::InterfaceHandle,
        types::{IfConfig, MacAddr},
    },
    driver::RadioDriver,
};

/// Reads and writes interface addresses; legal for both roles
pub struct AddressAccessor<D: RadioDriver> {
    driver: Arc<D>,
}

impl<D: RadioDriver> AddressAccessor<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    pub async fn mac(&self, handle: &InterfaceHandle) -> WlanResult<MacAddr> {
        self.driver
            .mac(handle.role())
            .await
            .context("cannot get MAC address")
    }

    /// Set the hardware address; `bytes` must be exactly six bytes long
    pub async fn set_mac(&self, handle: &InterfaceHandle, bytes: &[u8]) -> WlanResult<()> {
        let octets: [u8; MacAddr::LEN] =
            bytes.try_into().map_err(|_| WlanError::InvalidLength {
                expected: MacAddr::LEN,
                got: bytes.len(),
            })?;
        let mac = MacAddr(octets);

        self.driver
            .set_mac(handle.role(), mac)
            .await
            .context("cannot set MAC address")?;
        info!(role = %handle.role(), %mac, "MAC address updated");
        Ok(())
    }

    /// IPv4 address, netmask and gateway in dotted decimal; DNS left empty
    pub async fn ifconfig(&self, handle: &InterfaceHandle) -> WlanResult<IfConfig> {
        let info = self
            .driver
            .ip_info(handle.role())
            .await
            .context("cannot get IP info")?;
        Ok(IfConfig::from(info))
    }
}

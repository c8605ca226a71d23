//! Station connect / disconnect

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    core::{
        error::{DriverResultExt, WlanError, WlanResult},
        registry::{InterfaceHandle, require},
        types::{PASSWORD_CAPACITY, Role, SSID_CAPACITY, StationConfig, fill_buffer},
    },
    driver::RadioDriver,
};

/// Joins and leaves external access points through the station interface
pub struct StationConnector<D: RadioDriver> {
    driver: Arc<D>,
}

impl<D: RadioDriver> StationConnector<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Store the credentials and start connecting
    ///
    /// Returns once the radio accepted the request; progress is visible
    /// through the station status.
    pub async fn connect(
        &self,
        handle: &InterfaceHandle,
        ssid: &[u8],
        password: &[u8],
    ) -> WlanResult<()> {
        require(handle, Role::Station)?;

        if ssid.len() > SSID_CAPACITY {
            return Err(WlanError::InvalidArguments(format!(
                "SSID must be at most {SSID_CAPACITY} bytes, got {}",
                ssid.len()
            )));
        }
        if password.len() > PASSWORD_CAPACITY {
            return Err(WlanError::InvalidArguments(format!(
                "password must be at most {PASSWORD_CAPACITY} bytes, got {}",
                password.len()
            )));
        }

        let mut config = StationConfig::default();
        fill_buffer(&mut config.ssid, ssid, SSID_CAPACITY);
        fill_buffer(&mut config.password, password, PASSWORD_CAPACITY);

        self.driver
            .set_station_config(&config)
            .await
            .context("cannot set STA config")?;
        debug!("Station configuration stored");

        self.driver
            .station_connect()
            .await
            .context("cannot connect to AP")?;
        info!(ssid = %String::from_utf8_lossy(ssid), "Station connection initiated");
        Ok(())
    }

    pub async fn disconnect(&self, handle: &InterfaceHandle) -> WlanResult<()> {
        require(handle, Role::Station)?;
        self.driver
            .station_disconnect()
            .await
            .context("cannot disconnect from AP")?;
        info!("Station disconnected");
        Ok(())
    }
}

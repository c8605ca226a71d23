//! Radio mode and interface status accessor

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    core::{
        error::{DriverResultExt, WlanResult},
        registry::InterfaceHandle,
        types::{InterfaceStatus, PhyMode, RadioMode, Role, StationStatus},
    },
    driver::RadioDriver,
};

/// Reads and writes the radio mode and per-interface status
///
/// Every read-modify-write of the mode goes through `mode_lock`, so
/// concurrent `set_active` calls on the two interfaces cannot lose each
/// other's bit.
pub struct ModeAccessor<D: RadioDriver> {
    driver: Arc<D>,
    mode_lock: Mutex<()>,
}

impl<D: RadioDriver> ModeAccessor<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            mode_lock: Mutex::new(()),
        }
    }

    /// Whether the interface's role is enabled in the radio mode
    pub async fn is_active(&self, handle: &InterfaceHandle) -> WlanResult<bool> {
        let mode = self.driver.mode().await.context("cannot get radio mode")?;
        Ok(mode.has_role(handle.role()))
    }

    /// Enable or disable the interface, leaving the other role untouched
    pub async fn set_active(&self, handle: &InterfaceHandle, enabled: bool) -> WlanResult<()> {
        let _guard = self.mode_lock.lock().await;

        let mode = self.driver.mode().await.context("cannot get radio mode")?;
        let updated = mode.with_role(handle.role(), enabled);
        if updated == mode {
            debug!(role = %handle.role(), enabled, "Radio mode unchanged");
            return Ok(());
        }

        self.driver
            .set_mode(updated)
            .await
            .context("cannot update i/f status")?;
        info!(role = %handle.role(), enabled, mode = updated.bits(), "Radio mode updated");
        Ok(())
    }

    /// Connection status of the interface
    pub async fn status(&self, handle: &InterfaceHandle) -> WlanResult<InterfaceStatus> {
        match handle.role() {
            Role::Station => {
                let status = self
                    .driver
                    .station_status()
                    .await
                    .context("cannot get STA status")?;
                Ok(InterfaceStatus::Station(status))
            }
            Role::AccessPoint => Ok(InterfaceStatus::NotApplicable),
        }
    }

    /// Station: associated and addressed. Access point: at least one client.
    pub async fn is_connected(&self, handle: &InterfaceHandle) -> WlanResult<bool> {
        match handle.role() {
            Role::Station => {
                let status = self
                    .driver
                    .station_status()
                    .await
                    .context("cannot get STA status")?;
                Ok(status == StationStatus::GotIp)
            }
            Role::AccessPoint => {
                let clients = self
                    .driver
                    .associated_clients()
                    .await
                    .context("cannot get AP client count")?;
                Ok(clients > 0)
            }
        }
    }

    /// Raw radio mode
    pub async fn wifi_mode(&self) -> WlanResult<RadioMode> {
        self.driver.mode().await.context("cannot get radio mode")
    }

    /// Replace the radio mode as a whole
    pub async fn set_wifi_mode(&self, mode: RadioMode) -> WlanResult<()> {
        let _guard = self.mode_lock.lock().await;
        self.driver
            .set_mode(mode)
            .await
            .context("cannot set radio mode")?;
        info!(mode = mode.bits(), "Radio mode replaced");
        Ok(())
    }

    pub async fn phy_mode(&self) -> WlanResult<PhyMode> {
        self.driver.phy_mode().await.context("cannot get PHY mode")
    }

    pub async fn set_phy_mode(&self, mode: PhyMode) -> WlanResult<()> {
        self.driver
            .set_phy_mode(mode)
            .await
            .context("cannot set PHY mode")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{error::WlanError, registry::resolve},
        driver::{DriverOp, SimulatedRadio},
    };
    use pretty_assertions::assert_eq;

    fn accessor() -> (Arc<SimulatedRadio>, ModeAccessor<SimulatedRadio>) {
        let radio = Arc::new(SimulatedRadio::new());
        (radio.clone(), ModeAccessor::new(radio))
    }

    #[tokio::test]
    async fn test_set_active_leaves_other_role_untouched() {
        let (_radio, modes) = accessor();
        let sta = resolve(0).unwrap();
        let ap = resolve(1).unwrap();

        assert!(modes.is_active(sta).await.unwrap());
        assert!(!modes.is_active(ap).await.unwrap());

        modes.set_active(ap, true).await.unwrap();
        assert!(modes.is_active(ap).await.unwrap());
        assert!(modes.is_active(sta).await.unwrap());

        modes.set_active(sta, false).await.unwrap();
        assert!(!modes.is_active(sta).await.unwrap());
        assert!(modes.is_active(ap).await.unwrap());
        assert_eq!(modes.wifi_mode().await.unwrap(), RadioMode::ACCESS_POINT);
    }

    #[tokio::test]
    async fn test_set_active_is_idempotent() {
        let (radio, modes) = accessor();
        let sta = resolve(0).unwrap();

        modes.set_active(sta, true).await.unwrap();
        modes.set_active(sta, true).await.unwrap();
        assert!(modes.is_active(sta).await.unwrap());
        assert!(!radio.calls().await.contains(&DriverOp::SetMode));
    }

    #[tokio::test]
    async fn test_concurrent_set_active_keeps_both_bits() {
        let (_radio, modes) = accessor();
        let sta = resolve(0).unwrap();
        let ap = resolve(1).unwrap();
        modes.set_active(sta, false).await.unwrap();

        let (a, b) = futures::join!(modes.set_active(sta, true), modes.set_active(ap, true));
        a.unwrap();
        b.unwrap();

        assert_eq!(
            modes.wifi_mode().await.unwrap(),
            RadioMode::STATION_AND_ACCESS_POINT
        );
    }

    #[tokio::test]
    async fn test_set_active_driver_failure() {
        let (radio, modes) = accessor();
        radio.set_failure(DriverOp::SetMode, true).await;

        let err = modes.set_active(resolve(1).unwrap(), true).await.unwrap_err();
        assert!(matches!(
            err,
            WlanError::Driver {
                context: "cannot update i/f status",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_status_per_role() {
        let (radio, modes) = accessor();
        assert_eq!(
            modes.status(resolve(0).unwrap()).await.unwrap(),
            InterfaceStatus::Station(StationStatus::Idle)
        );

        radio.clear_calls().await;
        assert_eq!(
            modes.status(resolve(1).unwrap()).await.unwrap(),
            InterfaceStatus::NotApplicable
        );
        assert!(radio.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_is_connected_per_role() {
        let (radio, modes) = accessor();
        let sta = resolve(0).unwrap();
        let ap = resolve(1).unwrap();

        assert!(!modes.is_connected(sta).await.unwrap());
        assert!(!modes.is_connected(ap).await.unwrap());

        radio
            .complete_connection(std::net::Ipv4Addr::new(192, 168, 1, 50))
            .await;
        radio.set_associated_clients(2).await;

        assert!(modes.is_connected(sta).await.unwrap());
        assert!(modes.is_connected(ap).await.unwrap());
    }

    #[tokio::test]
    async fn test_phy_mode_roundtrip() {
        let (_radio, modes) = accessor();
        modes.set_phy_mode(PhyMode::Ieee80211g).await.unwrap();
        assert_eq!(modes.phy_mode().await.unwrap(), PhyMode::Ieee80211g);
    }
}

//! Named-parameter configuration dispatcher
//!
//! Parameters are described once in [`PARAMETERS`]: the role each one
//! belongs to, how to write it into the role's record, and whether it can be
//! read back. A call resolves every name and checks the role before the
//! record is read from or written to the radio.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    core::{
        error::{DriverResultExt, WlanError, WlanResult},
        registry::{InterfaceHandle, require},
        types::{
            ApConfig, AuthMode, ConfigRecord, ConfigValue, PASSWORD_CAPACITY, Role, SSID_CAPACITY,
            fill_buffer,
        },
    },
    driver::RadioDriver,
};

type ApSetter = fn(&mut ApConfig, &ConfigValue) -> WlanResult<()>;
type ApGetter = fn(&ApConfig) -> ConfigValue;

/// One named configuration parameter
pub struct Parameter {
    pub name: &'static str,
    pub role: Role,
    set: ApSetter,
    get: Option<ApGetter>,
}

impl Parameter {
    /// Whether the value can be read back
    pub fn is_readable(&self) -> bool {
        self.get.is_some()
    }

    fn apply(&self, record: &mut ConfigRecord, value: &ConfigValue) -> WlanResult<()> {
        match record {
            ConfigRecord::AccessPoint(ap) => (self.set)(ap, value),
            ConfigRecord::Station(_) => Err(WlanError::RoleMismatch(self.role)),
        }
    }

    fn read(&self, record: &ConfigRecord) -> WlanResult<ConfigValue> {
        let get = self
            .get
            .ok_or_else(|| WlanError::UnknownParameter(self.name.to_string()))?;
        match record {
            ConfigRecord::AccessPoint(ap) => Ok(get(ap)),
            ConfigRecord::Station(_) => Err(WlanError::RoleMismatch(self.role)),
        }
    }
}

/// Every parameter the dispatcher knows
pub static PARAMETERS: [Parameter; 5] = [
    Parameter {
        name: "essid",
        role: Role::AccessPoint,
        set: set_essid,
        get: Some(get_essid),
    },
    Parameter {
        name: "hidden",
        role: Role::AccessPoint,
        set: set_hidden,
        get: Some(get_hidden),
    },
    Parameter {
        name: "authmode",
        role: Role::AccessPoint,
        set: set_authmode,
        get: Some(get_authmode),
    },
    Parameter {
        name: "password",
        role: Role::AccessPoint,
        set: set_password,
        get: None,
    },
    Parameter {
        name: "channel",
        role: Role::AccessPoint,
        set: set_channel,
        get: Some(get_channel),
    },
];

/// Find a parameter by name
pub fn lookup(name: &str) -> WlanResult<&'static Parameter> {
    PARAMETERS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| WlanError::UnknownParameter(name.to_string()))
}

fn expect_str<'v>(name: &str, value: &'v ConfigValue) -> WlanResult<&'v str> {
    match value {
        ConfigValue::Str(s) => Ok(s),
        other => Err(WlanError::InvalidArguments(format!(
            "{name} expects a string, got {other:?}"
        ))),
    }
}

fn expect_u8(name: &str, value: &ConfigValue) -> WlanResult<u8> {
    match value {
        ConfigValue::Int(i) => u8::try_from(*i)
            .map_err(|_| WlanError::InvalidArguments(format!("{name} out of range: {i}"))),
        other => Err(WlanError::InvalidArguments(format!(
            "{name} expects an integer, got {other:?}"
        ))),
    }
}

fn set_essid(ap: &mut ApConfig, value: &ConfigValue) -> WlanResult<()> {
    let essid = expect_str("essid", value)?;
    ap.ssid_len = fill_buffer(&mut ap.ssid, essid.as_bytes(), SSID_CAPACITY) as u8;
    Ok(())
}

fn get_essid(ap: &ApConfig) -> ConfigValue {
    ConfigValue::Str(String::from_utf8_lossy(ap.ssid_bytes()).into_owned())
}

fn set_hidden(ap: &mut ApConfig, value: &ConfigValue) -> WlanResult<()> {
    ap.ssid_hidden = match value {
        ConfigValue::Bool(b) => *b,
        ConfigValue::Int(i) => *i != 0,
        other => {
            return Err(WlanError::InvalidArguments(format!(
                "hidden expects a boolean, got {other:?}"
            )));
        }
    };
    Ok(())
}

fn get_hidden(ap: &ApConfig) -> ConfigValue {
    ConfigValue::Bool(ap.ssid_hidden)
}

fn set_authmode(ap: &mut ApConfig, value: &ConfigValue) -> WlanResult<()> {
    let raw = expect_u8("authmode", value)?;
    ap.auth_mode = AuthMode::try_from(raw)
        .map_err(|_| WlanError::InvalidArguments(format!("unknown authmode {raw}")))?;
    Ok(())
}

fn get_authmode(ap: &ApConfig) -> ConfigValue {
    ConfigValue::Int(i64::from(u8::from(ap.auth_mode)))
}

fn set_password(ap: &mut ApConfig, value: &ConfigValue) -> WlanResult<()> {
    let password = expect_str("password", value)?;
    // Last byte stays zero as terminator
    fill_buffer(&mut ap.password, password.as_bytes(), PASSWORD_CAPACITY - 1);
    Ok(())
}

fn set_channel(ap: &mut ApConfig, value: &ConfigValue) -> WlanResult<()> {
    ap.channel = expect_u8("channel", value)?;
    Ok(())
}

fn get_channel(ap: &ApConfig) -> ConfigValue {
    ConfigValue::Int(i64::from(ap.channel))
}

/// Shape of a config call: read one parameter or write several
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCall {
    Get(String),
    Set(Vec<(String, ConfigValue)>),
}

impl ConfigCall {
    /// Build a call from its optional parts, rejecting mixed or empty calls
    pub fn new(get: Option<String>, set: Vec<(String, ConfigValue)>) -> WlanResult<Self> {
        match (get, set.is_empty()) {
            (Some(_), false) => Err(WlanError::InvalidArguments(
                "either get or set arguments are allowed".to_string(),
            )),
            (None, true) => Err(WlanError::InvalidArguments(
                "either get or set arguments are required".to_string(),
            )),
            (Some(name), true) => Ok(ConfigCall::Get(name)),
            (None, false) => Ok(ConfigCall::Set(set)),
        }
    }
}

/// Reads and writes interface configuration by parameter name
pub struct ConfigDispatcher<D: RadioDriver> {
    driver: Arc<D>,
    write_lock: Mutex<()>,
}

impl<D: RadioDriver> ConfigDispatcher<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            write_lock: Mutex::new(()),
        }
    }

    /// Run a get or set call; a get returns the value, a set returns `None`
    pub async fn config(
        &self,
        handle: &InterfaceHandle,
        call: ConfigCall,
    ) -> WlanResult<Option<ConfigValue>> {
        match call {
            ConfigCall::Get(name) => self.get(handle, &name).await.map(Some),
            ConfigCall::Set(params) => self.set(handle, &params).await.map(|()| None),
        }
    }

    /// Write the named parameters in one record update
    pub async fn set(
        &self,
        handle: &InterfaceHandle,
        params: &[(String, ConfigValue)],
    ) -> WlanResult<()> {
        let resolved = params
            .iter()
            .map(|(name, value)| lookup(name).map(|param| (param, value)))
            .collect::<WlanResult<Vec<_>>>()?;

        let Some(role) = implied_role(resolved.iter().map(|(param, _)| *param))? else {
            return Err(WlanError::InvalidArguments(
                "no parameters given".to_string(),
            ));
        };
        require(handle, role)?;

        let _guard = self.write_lock.lock().await;
        let mut record = self.read_record(handle).await?;
        for (param, value) in &resolved {
            param.apply(&mut record, value)?;
        }
        self.write_record(&record).await?;

        debug!(
            role = %role,
            params = ?resolved.iter().map(|(p, _)| p.name).collect::<Vec<_>>(),
            "Interface configuration updated"
        );
        Ok(())
    }

    /// Read a single named parameter
    pub async fn get(&self, handle: &InterfaceHandle, name: &str) -> WlanResult<ConfigValue> {
        let param = lookup(name)?;
        if !param.is_readable() {
            return Err(WlanError::UnknownParameter(name.to_string()));
        }
        require(handle, param.role)?;

        let record = self.read_record(handle).await?;
        param.read(&record)
    }

    async fn read_record(&self, handle: &InterfaceHandle) -> WlanResult<ConfigRecord> {
        match handle.role() {
            Role::Station => self
                .driver
                .station_config()
                .await
                .map(ConfigRecord::Station)
                .context("can't get STA config"),
            Role::AccessPoint => self
                .driver
                .ap_config()
                .await
                .map(ConfigRecord::AccessPoint)
                .context("can't get AP config"),
        }
    }

    async fn write_record(&self, record: &ConfigRecord) -> WlanResult<()> {
        match record {
            ConfigRecord::Station(sta) => self
                .driver
                .set_station_config(sta)
                .await
                .context("can't set STA config"),
            ConfigRecord::AccessPoint(ap) => self
                .driver
                .set_ap_config(ap)
                .await
                .context("can't set AP config"),
        }
    }
}

/// The single role all `params` belong to, `None` if there are none
fn implied_role<'p>(params: impl Iterator<Item = &'p Parameter>) -> WlanResult<Option<Role>> {
    let mut role = None;
    for param in params {
        match role {
            None => role = Some(param.role),
            Some(r) if r != param.role => {
                return Err(WlanError::InvalidArguments(
                    "parameters for different interfaces".to_string(),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::registry::resolve,
        driver::{DriverOp, SimulatedRadio},
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn dispatcher() -> (Arc<SimulatedRadio>, ConfigDispatcher<SimulatedRadio>) {
        let radio = Arc::new(SimulatedRadio::new());
        (radio.clone(), ConfigDispatcher::new(radio))
    }

    fn params(pairs: &[(&str, ConfigValue)]) -> Vec<(String, ConfigValue)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_parameter_names_unique() {
        let names: HashSet<_> = PARAMETERS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PARAMETERS.len());
    }

    #[test]
    fn test_password_not_readable() {
        assert!(!lookup("password").unwrap().is_readable());
        assert!(lookup("essid").unwrap().is_readable());
        assert!(matches!(lookup("txpower"), Err(WlanError::UnknownParameter(_))));
    }

    #[test]
    fn test_config_call_shapes() {
        assert_eq!(
            ConfigCall::new(Some("essid".into()), vec![]).unwrap(),
            ConfigCall::Get("essid".into())
        );
        assert!(matches!(
            ConfigCall::new(Some("essid".into()), params(&[("channel", ConfigValue::Int(6))])),
            Err(WlanError::InvalidArguments(_))
        ));
        assert!(matches!(
            ConfigCall::new(None, vec![]),
            Err(WlanError::InvalidArguments(_))
        ));
    }

    #[tokio::test]
    async fn test_ap_set_then_get_roundtrip() {
        let (_radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        config
            .set(ap, &params(&[("essid", "net1".into()), ("channel", ConfigValue::Int(6))]))
            .await
            .unwrap();

        assert_eq!(config.get(ap, "essid").await.unwrap(), ConfigValue::Str("net1".into()));
        assert_eq!(config.get(ap, "channel").await.unwrap(), ConfigValue::Int(6));
    }

    #[tokio::test]
    async fn test_station_rejected_before_driver_call() {
        let (radio, config) = dispatcher();
        let sta = resolve(0).unwrap();

        let err = config
            .set(sta, &params(&[("essid", "net1".into()), ("channel", ConfigValue::Int(6))]))
            .await
            .unwrap_err();
        assert_eq!(err, WlanError::RoleMismatch(Role::AccessPoint));

        let err = config.get(sta, "essid").await.unwrap_err();
        assert_eq!(err, WlanError::RoleMismatch(Role::AccessPoint));
        assert!(radio.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_password_never_retrievable() {
        let (radio, config) = dispatcher();
        for index in 0..2 {
            let err = config
                .get(resolve(index).unwrap(), "password")
                .await
                .unwrap_err();
            assert_eq!(err, WlanError::UnknownParameter("password".into()));
        }
        assert!(radio.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_name_aborts_whole_set() {
        let (radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        let err = config
            .set(
                ap,
                &params(&[
                    ("channel", ConfigValue::Int(11)),
                    ("txpower", ConfigValue::Int(20)),
                ]),
            )
            .await
            .unwrap_err();
        assert_eq!(err, WlanError::UnknownParameter("txpower".into()));
        assert!(radio.calls().await.is_empty());
        assert_eq!(config.get(ap, "channel").await.unwrap(), ConfigValue::Int(1));
    }

    #[tokio::test]
    async fn test_invalid_value_skips_driver_write() {
        let (radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        let err = config
            .set(ap, &params(&[("essid", "x".into()), ("channel", ConfigValue::Int(300))]))
            .await
            .unwrap_err();
        assert!(matches!(err, WlanError::InvalidArguments(_)));

        let err = config
            .set(ap, &params(&[("authmode", ConfigValue::Int(9))]))
            .await
            .unwrap_err();
        assert!(matches!(err, WlanError::InvalidArguments(_)));
        assert!(!radio.calls().await.iter().any(|op| op.is_write()));
    }

    #[tokio::test]
    async fn test_all_ap_fields() {
        let (radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        config
            .set(
                ap,
                &params(&[
                    ("hidden", true.into()),
                    ("authmode", ConfigValue::Int(3)),
                    ("password", "a".repeat(80).as_str().into()),
                    ("essid", "x".repeat(40).as_str().into()),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(config.get(ap, "hidden").await.unwrap(), ConfigValue::Bool(true));
        assert_eq!(config.get(ap, "authmode").await.unwrap(), ConfigValue::Int(3));
        assert_eq!(
            config.get(ap, "essid").await.unwrap(),
            ConfigValue::Str("x".repeat(SSID_CAPACITY))
        );

        let stored = radio.ap_config().await.unwrap();
        assert_eq!(stored.password_bytes().len(), PASSWORD_CAPACITY - 1);
        assert_eq!(stored.password[PASSWORD_CAPACITY - 1], 0);
        assert_eq!(stored.auth_mode, AuthMode::Wpa2Psk);
        assert_eq!(stored.max_connection, ApConfig::default().max_connection);
    }

    #[tokio::test]
    async fn test_shorter_password_clears_tail() {
        let (radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        config
            .set(ap, &params(&[("password", "longpassword".into())]))
            .await
            .unwrap();
        config
            .set(ap, &params(&[("password", "short".into())]))
            .await
            .unwrap();
        assert_eq!(radio.ap_config().await.unwrap().password_bytes(), b"short");
    }

    #[tokio::test]
    async fn test_config_call_dispatch() {
        let (_radio, config) = dispatcher();
        let ap = resolve(1).unwrap();

        let set = ConfigCall::new(None, params(&[("hidden", ConfigValue::Int(1))])).unwrap();
        assert_eq!(config.config(ap, set).await.unwrap(), None);

        let get = ConfigCall::new(Some("hidden".into()), vec![]).unwrap();
        assert_eq!(
            config.config(ap, get).await.unwrap(),
            Some(ConfigValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_driver_write_failure() {
        let (radio, config) = dispatcher();
        radio.set_failure(DriverOp::SetApConfig, true).await;

        let err = config
            .set(resolve(1).unwrap(), &params(&[("channel", ConfigValue::Int(3))]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WlanError::Driver {
                context: "can't set AP config",
                ..
            }
        ));
    }
}

//! Error types for the WLAN interface controller

use thiserror::Error;

use super::types::Role;

/// Result type for radio driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// Result type for controller operations
pub type WlanResult<T> = Result<T, WlanError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure reported by the radio driver
///
/// The controller never interprets the code, it only wraps it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("driver error {code}: {message}")]
pub struct DriverError {
    pub code: i32,
    pub message: String,
}

impl DriverError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Why a scan did not produce results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    #[error("no completion within the scan timeout")]
    Timeout,

    #[error("driver dropped the completion without reporting")]
    Abandoned,

    #[error("{0}")]
    Driver(DriverError),
}

/// Errors returned by controller operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WlanError {
    #[error("{0} required")]
    RoleMismatch(Role),

    #[error("interface index {0} out of range")]
    OutOfRange(i64),

    #[error("scan unsupported in AP mode")]
    UnsupportedMode,

    #[error("scan already in progress")]
    ScanInProgress,

    #[error("scan failed: {0}")]
    ScanFailed(ScanFailure),

    #[error("unknown config param: {0}")]
    UnknownParameter(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid buffer length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("{context}: {source}")]
    Driver {
        context: &'static str,
        #[source]
        source: DriverError,
    },
}

/// Attach an operation context to a driver failure
pub trait DriverResultExt<T> {
    fn context(self, context: &'static str) -> WlanResult<T>;
}

impl<T> DriverResultExt<T> for DriverResult<T> {
    fn context(self, context: &'static str) -> WlanResult<T> {
        self.map_err(|source| WlanError::Driver { context, source })
    }
}

/// Errors related to the transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! WLAN interface controller
//!
//! Controls one radio that serves two logical interfaces, a station that
//! joins external networks and a soft access point that hosts one:
//! - mode, status and address queries per interface
//! - blocking network scans on top of the radio's completion callback
//! - keyword-style configuration through a static parameter table
//! - a JSON-RPC 2.0 front end over a Unix domain socket

pub mod config;
pub mod core;
pub mod driver;
pub mod protocol;
pub mod transport;

pub use crate::core::{
    error::{DriverError, ScanFailure, TransportError, WlanError},
    service::{WlanInterface, WlanService},
    types::{
        AP_IF, AuthMode, ConfigValue, InterfaceStatus, MacAddr, PhyMode, RadioMode, Role,
        STA_IF, ScanRecord,
    },
};

//! Runtime settings

use std::{path::PathBuf, time::Duration};

use crate::{config::CliArgs, core::types::MacAddr};

/// Runtime configuration settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub socket_path: String,
    pub socket_mode: u32,
    pub scan_timeout: Duration,
    pub environment: Option<PathBuf>,
    pub station_mac: Option<MacAddr>,
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        // Parse octal socket mode
        let socket_mode = u32::from_str_radix(&args.socket_mode, 8).unwrap_or(0o660);

        Settings {
            socket_path: args.socket_path,
            socket_mode,
            scan_timeout: Duration::from_millis(args.scan_timeout_ms),
            environment: args.environment,
            station_mac: args.mac,
        }
    }
}

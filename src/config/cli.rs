//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::core::types::MacAddr;

#[derive(Parser, Debug, Clone)]
#[clap(name = "wlan-netif", version, author)]
#[clap(about = "Dual-role WLAN interface controller with a JSON-RPC Unix socket")]
pub struct CliArgs {
    /// Path for Unix socket
    #[clap(long, default_value = "/run/wlan-netif.sock")]
    pub socket_path: String,

    /// Socket file permissions (octal, e.g., 660)
    #[clap(long, default_value = "660")]
    pub socket_mode: String,

    /// Give up on a scan after this many milliseconds
    #[clap(long, default_value_t = 10_000)]
    pub scan_timeout_ms: u64,

    /// JSON file describing the simulated radio environment
    #[clap(short, long)]
    pub environment: Option<PathBuf>,

    /// Station MAC address override (aa:bb:cc:dd:ee:ff)
    #[clap(long)]
    pub mac: Option<MacAddr>,
}

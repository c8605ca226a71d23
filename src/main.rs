//! WLAN interface controller - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wlan_netif::{
    config::{CliArgs, Settings},
    core::service::WlanService,
    driver::{SimEnvironment, SimulatedRadio},
    transport::unix_socket::UnixSocketServer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wlan_netif=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();
    info!(?args, "Starting WLAN interface controller");
    let settings = Settings::from(args);

    // Create radio
    let mut environment = match &settings.environment {
        Some(path) => {
            let environment = SimEnvironment::load(path).await.inspect_err(|e| {
                error!("Cannot load radio environment {}: {}", path.display(), e);
            })?;
            info!(
                "Loaded {} networks from {}",
                environment.networks.len(),
                path.display()
            );
            environment
        }
        None => SimEnvironment::default(),
    };
    if settings.station_mac.is_some() {
        environment.station_mac = settings.station_mac;
    }
    let radio = Arc::new(SimulatedRadio::from_environment(environment).await);

    let service = Arc::new(WlanService::new(radio, settings.scan_timeout));
    info!(timeout = ?settings.scan_timeout, "WLAN controller created");

    // Start Unix socket transport
    let server = UnixSocketServer::new(settings.socket_path.clone(), settings.socket_mode, service);
    let listener = server.bind().await.inspect_err(|e| {
        error!("Cannot bind {}: {}", settings.socket_path, e);
    })?;

    let tasks = vec![tokio::spawn(async move {
        if let Err(e) = server.serve(listener).await {
            error!("Unix socket server error: {}", e);
        }
    })];

    #[cfg(feature = "systemd")]
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        error!("Failed to notify service manager: {}", e);
    }

    info!("Service started successfully");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        _ = shutdown_signal() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        _ = futures::future::join_all(tasks) => {
            info!("All tasks completed");
        }
    }

    #[cfg(feature = "systemd")]
    let _ = sd_notify::notify(false, &[sd_notify::NotifyState::Stopping]);

    info!("Shutting down...");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    // On non-Unix platforms, just wait forever
    std::future::pending::<()>().await
}

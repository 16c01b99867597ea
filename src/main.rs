// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Rider Saathi API Server
//!
//! Tracks online riders, tells them who is nearby, and fans out emergency
//! alerts over WebSocket.

use rider_saathi::{
    config::Config,
    services::sweeper::{run_heartbeat, run_sweeper},
    AppState,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        nearby_radius_m = config.nearby_radius_meters,
        alert_radius_m = config.emergency_radius_meters,
        "Starting Rider Saathi API"
    );

    // Build shared state; everything lives in memory for the life of the process
    let state = Arc::new(AppState::new(config.clone()));

    // Background tasks
    let cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(run_sweeper(
        state.broadcast.clone(),
        config.sweep_interval,
        cancel.clone(),
    ));
    let heartbeat_handle = tokio::spawn(run_heartbeat(state.broadcast.clone(), cancel.clone()));

    // Build router
    let app = rider_saathi::routes::create_router(state.clone());

    // Start server
    let addr = SocketAddr::new(config.host.parse::<IpAddr>()?, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    // Upgraded sockets outlive the HTTP connections, so close them as soon
    // as the signal arrives.
    let shutdown_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_state.broadcast.hub().shutdown_all();
        })
        .await?;

    // Post-shutdown cleanup
    tracing::info!("Server stopped accepting connections, cleaning up");
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), heartbeat_handle).await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rider_saathi=debug,info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

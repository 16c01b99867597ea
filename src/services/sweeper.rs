// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Periodic background tasks: the sweep and the WebSocket heartbeat.

use crate::services::BroadcastService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Interval between heartbeat pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Run the sweep loop until `cancel` is triggered.
///
/// Flags silent riders offline and purges old non-active emergencies.
pub async fn run_sweeper(
    service: Arc<BroadcastService>,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Sweeper started");

    let mut interval = tokio::time::interval(every);
    // The first tick fires immediately; skip it so a fresh process sweeps
    // only after one full interval.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let report = service.sweep(Utc::now());
                if report.is_empty() {
                    tracing::debug!("Sweep: nothing to age out");
                } else {
                    tracing::info!(
                        riders_marked_offline = report.riders_marked_offline,
                        riders_removed = report.riders_removed,
                        emergencies_purged = report.emergencies_purged,
                        "Sweep completed"
                    );
                }
            }
        }
    }
}

/// Send a Ping to every connection on a fixed interval until cancelled.
pub async fn run_heartbeat(service: Arc<BroadcastService>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let count = service.hub().connection_count();
                tracing::debug!(count, "WebSocket heartbeat ping");
                service.hub().ping_all();
            }
        }
    }
}

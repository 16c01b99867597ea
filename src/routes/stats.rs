// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Aggregate statistics route.

use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RiderStats {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmergencyStats {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    /// Responses across all stored emergencies
    pub responses: usize,
}

/// Stats response.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub riders: RiderStats,
    pub emergencies: EmergencyStats,
    /// Live WebSocket connections
    pub connections: usize,
    pub uptime_seconds: i64,
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = state.broadcast.stats();
    let uptime = chrono::Utc::now() - state.started_at;

    Json(StatsResponse {
        riders: RiderStats {
            total: stats.riders.total,
            online: stats.riders.online,
            offline: stats.riders.total.saturating_sub(stats.riders.online),
        },
        emergencies: EmergencyStats {
            total: stats.emergencies.total,
            active: stats.emergencies.active,
            resolved: stats.emergencies.resolved,
            responses: stats.emergencies.responses,
        },
        connections: stats.connections,
        uptime_seconds: uptime.num_seconds().max(0),
    })
}

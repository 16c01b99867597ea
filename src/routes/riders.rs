// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Rider proximity routes.

use crate::error::Result;
use crate::extract::ValidatedJson;
use crate::models::{NearbyRider, NearbyRidersRequest};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/riders/nearby", post(nearby_riders))
}

/// Online riders near the given point, excluding the caller, nearest first.
///
/// Read-only: the caller's stored position is not updated.
async fn nearby_riders(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NearbyRidersRequest>,
) -> Result<Json<Vec<NearbyRider>>> {
    let riders = state
        .broadcast
        .nearby_riders_at(&req.user_id, &req.location, req.radius);

    tracing::debug!(
        user_id = %req.user_id,
        radius = ?req.radius,
        found = riders.len(),
        "Nearby riders query"
    );

    Ok(Json(riders))
}

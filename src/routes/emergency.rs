// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Emergency alert routes.

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::models::{
    CreateEmergencyRequest, EmergencyRecord, NearbyEmergenciesRequest, NearbyEmergency,
    RespondRequest, StatusUpdateRequest,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/emergency/create", post(create_emergency))
        .route("/api/emergency/nearby", post(nearby_emergencies))
        .route("/api/emergency/{id}/respond", post(respond))
        .route("/api/emergency/{id}", patch(update_status))
}

/// Any ID that is not a UUID cannot name a stored emergency.
fn parse_emergency_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Emergency {raw} not found")))
}

/// Raise an emergency and alert riders within the alert radius.
async fn create_emergency(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateEmergencyRequest>,
) -> Result<(StatusCode, Json<EmergencyRecord>)> {
    let emergency = state.broadcast.create_emergency(None, &req);
    Ok((StatusCode::CREATED, Json(emergency)))
}

/// Active emergencies near a point, nearest first.
async fn nearby_emergencies(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<NearbyEmergenciesRequest>,
) -> Result<Json<Vec<NearbyEmergency>>> {
    Ok(Json(
        state
            .broadcast
            .nearby_emergencies(&req.location, req.radius),
    ))
}

/// Record a response; the creator is notified over the real-time channel.
async fn respond(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RespondRequest>,
) -> Result<Json<EmergencyRecord>> {
    let id = parse_emergency_id(&id)?;
    Ok(Json(state.broadcast.respond(id, &req)?))
}

/// Change status. Only the creator may do this (403 otherwise).
async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<StatusUpdateRequest>,
) -> Result<Json<EmergencyRecord>> {
    let id = parse_emergency_id(&id)?;
    Ok(Json(
        state
            .broadcast
            .update_status(id, req.status, &req.user_id)?,
    ))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Emergency alerts raised by riders and the responses they collect.

use super::{Location, MAX_RADIUS_METERS, MAX_USER_ID_LEN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of an emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EmergencyStatus {
    Active,
    Resolved,
}

/// A response from another rider ("on my way", "calling help", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmergencyResponse {
    pub user_id: String,
    pub response_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Stored emergency alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmergencyRecord {
    pub id: Uuid,
    /// Creator of the alert
    pub user_id: String,
    /// Free-form category, e.g. "accident", "breakdown", "medical"
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: EmergencyStatus,
    pub responses: Vec<EmergencyResponse>,
}

impl EmergencyRecord {
    pub fn is_active(&self) -> bool {
        self.status == EmergencyStatus::Active
    }
}

/// An emergency found by a proximity query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NearbyEmergency {
    #[serde(flatten)]
    pub emergency: EmergencyRecord,
    /// Distance from the query origin in meters
    pub distance: f64,
}

/// Body of `POST /api/emergency/create` and the `emergency-broadcast` event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmergencyRequest {
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub kind: String,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
    #[validate(nested)]
    pub location: Location,
}

/// Body of `POST /api/emergency/nearby`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NearbyEmergenciesRequest {
    #[validate(nested)]
    pub location: Location,
    #[validate(range(exclusive_min = 0.0, max = MAX_RADIUS_METERS))]
    pub radius: Option<f64>,
}

/// Body of `POST /api/emergency/{id}/respond`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64))]
    pub response_type: String,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// Body of `PATCH /api/emergency/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: EmergencyStatus,
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
}

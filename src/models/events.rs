// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Real-time channel messages.
//!
//! Every WebSocket text frame is `{"event": "<name>", "data": <payload>}`.

use super::{
    CreateEmergencyRequest, EmergencyRecord, EmergencyStatus, Location, LocationUpdate,
    NearbyRider, RespondRequest, MAX_USER_ID_LEN,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Messages accepted from clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinUserRoom(String),
    LocationUpdate(LocationUpdate),
    EmergencyBroadcast(CreateEmergencyRequest),
    EmergencyRespond(SocketRespond),
    EmergencyStatus(SocketStatusUpdate),
}

impl ClientEvent {
    /// Event name as it appears on the wire, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinUserRoom(_) => "join-user-room",
            ClientEvent::LocationUpdate(_) => "location-update",
            ClientEvent::EmergencyBroadcast(_) => "emergency-broadcast",
            ClientEvent::EmergencyRespond(_) => "emergency-respond",
            ClientEvent::EmergencyStatus(_) => "emergency-status",
        }
    }

    /// Validate the payload before it touches any state.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ClientEvent::JoinUserRoom(user_id) => {
                let len = user_id.chars().count() as u64;
                if len == 0 || len > MAX_USER_ID_LEN {
                    let mut errors = ValidationErrors::new();
                    errors.add("userId", validator::ValidationError::new("length"));
                    return Err(errors);
                }
                Ok(())
            }
            ClientEvent::LocationUpdate(update) => update.validate(),
            ClientEvent::EmergencyBroadcast(req) => req.validate(),
            ClientEvent::EmergencyRespond(req) => req.validate(),
            ClientEvent::EmergencyStatus(req) => req.validate(),
        }
    }
}

/// `emergency-respond` payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocketRespond {
    pub emergency_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub response: RespondRequest,
}

/// `emergency-status` payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocketStatusUpdate {
    pub emergency_id: Uuid,
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
    pub status: EmergencyStatus,
}

/// Messages pushed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    RidersNearby(Vec<NearbyRider>),
    RiderLocationUpdate(RiderLocationUpdate),
    EmergencyAlert(EmergencyAlert),
    EmergencyCreated(EmergencyRecord),
    EmergencyResponse(EmergencyResponseNotice),
    EmergencyUpdate(EmergencyRecord),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RidersNearby(_) => "riders-nearby",
            ServerEvent::RiderLocationUpdate(_) => "rider-location-update",
            ServerEvent::EmergencyAlert(_) => "emergency-alert",
            ServerEvent::EmergencyCreated(_) => "emergency-created",
            ServerEvent::EmergencyResponse(_) => "emergency-response",
            ServerEvent::EmergencyUpdate(_) => "emergency-update",
        }
    }
}

/// Sent to riders near someone who just moved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiderLocationUpdate {
    pub user_id: String,
    pub location: Location,
    pub accuracy: Option<f64>,
    /// Distance between the mover and the recipient in meters
    pub distance: f64,
    pub timestamp: DateTime<Utc>,
}

/// Sent to riders within the alert radius of a new emergency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyAlert {
    #[serde(flatten)]
    pub emergency: EmergencyRecord,
    pub distance: f64,
}

/// Sent to the creator of an emergency when someone responds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyResponseNotice {
    pub emergency_id: Uuid,
    pub user_id: String,
    pub response_type: String,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

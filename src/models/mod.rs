// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Data models for the application.

pub mod emergency;
pub mod events;
pub mod location;
pub mod rider;

pub use emergency::{
    CreateEmergencyRequest, EmergencyRecord, EmergencyResponse, EmergencyStatus,
    NearbyEmergenciesRequest, NearbyEmergency, RespondRequest, StatusUpdateRequest,
};
pub use events::{ClientEvent, ServerEvent};
pub use location::Location;
pub use rider::{LocationUpdate, NearbyRider, NearbyRidersRequest, RiderRecord};

/// Identifier of a single real-time connection.
pub type ConnectionId = uuid::Uuid;

/// Longest accepted user identifier.
pub const MAX_USER_ID_LEN: u64 = 128;

/// Largest radius a caller may request, in meters.
pub const MAX_RADIUS_METERS: f64 = 100_000.0;

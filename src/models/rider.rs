// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Rider directory records and proximity query shapes.

use super::{ConnectionId, Location, MAX_RADIUS_METERS, MAX_USER_ID_LEN};
use crate::time_utils::ClientTimestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Last known state of a rider. Owned by the rider directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderRecord {
    pub user_id: String,
    pub location: Location,
    /// Reported GPS accuracy in meters
    pub accuracy: Option<f64>,
    /// Server time of the last update
    pub last_seen: DateTime<Utc>,
    pub is_online: bool,
    /// Connection the most recent update arrived on
    pub socket_id: Option<ConnectionId>,
    /// Client clock at the time of the fix, if sent
    pub reported_at: Option<DateTime<Utc>>,
}

/// A rider found by a proximity scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NearbyRider {
    pub user_id: String,
    pub location: Location,
    pub accuracy: Option<f64>,
    /// Distance from the query origin in meters
    pub distance: f64,
    pub last_seen: DateTime<Utc>,
}

impl NearbyRider {
    pub(crate) fn from_record(record: &RiderRecord, distance: f64) -> Self {
        Self {
            user_id: record.user_id.clone(),
            location: record.location,
            accuracy: record.accuracy,
            distance,
            last_seen: record.last_seen,
        }
    }
}

/// `location-update` payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
    #[validate(nested)]
    pub location: Location,
    #[validate(range(min = 0.0))]
    pub accuracy: Option<f64>,
    #[serde(default, deserialize_with = "crate::time_utils::deserialize_lenient_timestamp")]
    pub timestamp: Option<ClientTimestamp>,
}

/// Body of `POST /api/riders/nearby`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRidersRequest {
    #[validate(length(min = 1, max = MAX_USER_ID_LEN))]
    pub user_id: String,
    #[validate(nested)]
    pub location: Location,
    #[validate(range(exclusive_min = 0.0, max = MAX_RADIUS_METERS))]
    pub radius: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_update_parses_camel_case() {
        let update: LocationUpdate = serde_json::from_str(
            r#"{"userId":"u1","location":{"lat":28.6,"lng":77.2},"accuracy":8.5,"timestamp":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(update.user_id, "u1");
        assert_eq!(update.accuracy, Some(8.5));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_location_update_rejects_bad_coordinates() {
        let update = LocationUpdate {
            user_id: "u1".to_string(),
            location: Location::new(123.0, 77.2),
            accuracy: None,
            timestamp: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_nearby_request_radius_bounds() {
        let mut req = NearbyRidersRequest {
            user_id: "u1".to_string(),
            location: Location::new(28.6, 77.2),
            radius: Some(0.0),
        };
        assert!(req.validate().is_err());

        req.radius = Some(MAX_RADIUS_METERS + 1.0);
        assert!(req.validate().is_err());

        req.radius = None;
        assert!(req.validate().is_ok());
    }
}

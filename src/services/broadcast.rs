// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Proximity broadcast service.
//!
//! Owns the rider directory, the emergency board and the connection hub,
//! and routes location and emergency events to the riders they concern:
//! 1. Location updates refresh the directory and fan out to nearby riders
//! 2. New emergencies alert online riders within the alert radius
//! 3. Responses and status changes notify the emergency's creator

use crate::config::Config;
use crate::error::Result;
use crate::models::events::{EmergencyAlert, EmergencyResponseNotice, RiderLocationUpdate};
use crate::models::{
    ConnectionId, CreateEmergencyRequest, EmergencyRecord, EmergencyStatus, Location,
    LocationUpdate, NearbyEmergency, NearbyRider, RespondRequest, ServerEvent,
};
use crate::services::emergencies::{EmergencyBoard, EmergencyCounts};
use crate::services::hub::{ConnectionHub, OutboundReceiver};
use crate::services::riders::{RiderCounts, RiderDirectory, RiderSweep};
use crate::time_utils::chrono_duration;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use validator::Validate;

/// Offline riders are forgotten after this long without an update.
const RIDER_RETENTION_HOURS: i64 = 24;

/// Radii and ageing thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ProximitySettings {
    /// Default radius for nearby-rider scans, in meters
    pub nearby_radius: f64,
    /// Radius for emergency alerts and nearby-emergency queries, in meters
    pub alert_radius: f64,
    /// Silence after which a rider is flagged offline
    pub rider_timeout: Duration,
    /// Age after which non-active emergencies are purged
    pub emergency_retention: Duration,
    /// Silence after which an offline rider is dropped
    pub rider_retention: Duration,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ProximitySettings {
    fn from(config: &Config) -> Self {
        Self {
            nearby_radius: config.nearby_radius_meters,
            alert_radius: config.emergency_radius_meters,
            rider_timeout: chrono_duration(config.rider_timeout),
            emergency_retention: chrono_duration(config.emergency_retention),
            rider_retention: Duration::hours(RIDER_RETENTION_HOURS),
        }
    }
}

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub riders_marked_offline: usize,
    pub riders_removed: usize,
    pub emergencies_purged: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate counters exposed by `/api/stats` and `/api/health`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub riders: RiderCounts,
    pub emergencies: EmergencyCounts,
    pub connections: usize,
}

/// The proximity broadcast service. Shared through `AppState`.
#[derive(Debug, Default)]
pub struct BroadcastService {
    riders: RiderDirectory,
    emergencies: EmergencyBoard,
    hub: ConnectionHub,
    settings: ProximitySettings,
}

impl BroadcastService {
    pub fn new(settings: ProximitySettings) -> Self {
        Self {
            riders: RiderDirectory::new(),
            emergencies: EmergencyBoard::new(),
            hub: ConnectionHub::new(),
            settings,
        }
    }

    pub fn riders(&self) -> &RiderDirectory {
        &self.riders
    }

    pub fn emergencies(&self) -> &EmergencyBoard {
        &self.emergencies
    }

    pub fn hub(&self) -> &ConnectionHub {
        &self.hub
    }

    // ─── Connections ─────────────────────────────────────────────

    /// Register a new connection and return its ID and outbound queue.
    pub fn connect(&self) -> (ConnectionId, OutboundReceiver) {
        let conn_id = Uuid::new_v4();
        let rx = self.hub.add(conn_id);
        (conn_id, rx)
    }

    /// Bind a connection to a user (`join-user-room`).
    ///
    /// Multiple connections per user are allowed; the newest one becomes
    /// the rider's current connection.
    pub fn join_user_room(&self, conn_id: ConnectionId, user_id: &str) {
        self.hub.join(conn_id, user_id);
        let had_record = self.riders.bind_connection(user_id, conn_id);
        tracing::info!(%conn_id, user_id, had_record, "User joined room");
    }

    /// Tear down a connection. The rider bound to it, if any, goes offline.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        self.hub.remove(conn_id);
        if let Some(user_id) = self.riders.mark_disconnected(conn_id) {
            tracing::info!(%conn_id, user_id, "Rider went offline");
        }
    }

    // ─── Riders ──────────────────────────────────────────────────

    /// Record a location fix and notify nearby riders.
    ///
    /// Malformed input leaves the directory untouched. On success the
    /// sender receives `riders-nearby` and every nearby rider's current
    /// connection receives `rider-location-update`.
    pub fn update_location(
        &self,
        conn_id: Option<ConnectionId>,
        update: LocationUpdate,
    ) -> Result<Vec<NearbyRider>> {
        update.validate()?;

        let now = Utc::now();
        if let Some(conn_id) = conn_id {
            self.hub.join(conn_id, &update.user_id);
        }
        let record = self.riders.update_location(&update, conn_id, now);

        let nearby = self
            .riders
            .find_nearby(&record.user_id, self.settings.nearby_radius);

        if let Some(conn_id) = conn_id {
            self.hub
                .send(conn_id, ServerEvent::RidersNearby(nearby.clone()));
        }

        for neighbour in &nearby {
            let Some(target) = self.riders.get(&neighbour.user_id).and_then(|r| r.socket_id)
            else {
                continue;
            };
            self.hub.send(
                target,
                ServerEvent::RiderLocationUpdate(RiderLocationUpdate {
                    user_id: record.user_id.clone(),
                    location: record.location,
                    accuracy: record.accuracy,
                    distance: neighbour.distance,
                    timestamp: record.reported_at.unwrap_or(now),
                }),
            );
        }

        tracing::debug!(
            user_id = %record.user_id,
            nearby = nearby.len(),
            "Location updated"
        );

        Ok(nearby)
    }

    /// Online riders near a stored rider (default radius when `None`).
    pub fn find_nearby(&self, user_id: &str, radius: Option<f64>) -> Vec<NearbyRider> {
        self.riders
            .find_nearby(user_id, radius.unwrap_or(self.settings.nearby_radius))
    }

    /// Online riders near an explicit point, excluding `user_id`.
    pub fn nearby_riders_at(
        &self,
        user_id: &str,
        origin: &Location,
        radius: Option<f64>,
    ) -> Vec<NearbyRider> {
        self.riders.find_near(
            origin,
            Some(user_id),
            radius.unwrap_or(self.settings.nearby_radius),
        )
    }

    // ─── Emergencies ─────────────────────────────────────────────

    /// Create an emergency and alert nearby riders. Input must already be validated.
    ///
    /// When raised over a connection, that connection gets an
    /// `emergency-created` acknowledgement carrying the new ID.
    pub fn create_emergency(
        &self,
        origin: Option<ConnectionId>,
        req: &CreateEmergencyRequest,
    ) -> EmergencyRecord {
        let emergency = self.emergencies.create(req, Utc::now());

        if let Some(conn_id) = origin {
            self.hub.join(conn_id, &emergency.user_id);
            self.hub
                .send(conn_id, ServerEvent::EmergencyCreated(emergency.clone()));
        }

        let notified = self.broadcast_emergency(&emergency);
        tracing::info!(
            emergency_id = %emergency.id,
            user_id = %emergency.user_id,
            kind = %emergency.kind,
            notified,
            "Emergency created"
        );

        emergency
    }

    /// Push `emergency-alert` to online riders within the alert radius,
    /// excluding the creator. Returns the number of riders alerted.
    pub fn broadcast_emergency(&self, emergency: &EmergencyRecord) -> usize {
        let targets = self.riders.find_near(
            &emergency.location,
            Some(&emergency.user_id),
            self.settings.alert_radius,
        );

        targets
            .iter()
            .filter(|rider| {
                let Some(conn_id) = self.riders.get(&rider.user_id).and_then(|r| r.socket_id)
                else {
                    return false;
                };
                self.hub.send(
                    conn_id,
                    ServerEvent::EmergencyAlert(EmergencyAlert {
                        emergency: emergency.clone(),
                        distance: rider.distance,
                    }),
                )
            })
            .count()
    }

    /// Active emergencies near a point (alert radius when `None`).
    pub fn nearby_emergencies(&self, origin: &Location, radius: Option<f64>) -> Vec<NearbyEmergency> {
        self.emergencies
            .find_near(origin, radius.unwrap_or(self.settings.alert_radius))
    }

    /// Record a response and notify the creator's room.
    pub fn respond(&self, emergency_id: Uuid, req: &RespondRequest) -> Result<EmergencyRecord> {
        let (emergency, response) = self.emergencies.respond(emergency_id, req, Utc::now())?;

        let notice = ServerEvent::EmergencyResponse(EmergencyResponseNotice {
            emergency_id,
            user_id: response.user_id,
            response_type: response.response_type,
            message: response.message,
            timestamp: response.timestamp,
        });
        let delivered = self.hub.send_to_user(&emergency.user_id, &notice);

        tracing::info!(
            %emergency_id,
            responder = %req.user_id,
            response_type = %req.response_type,
            delivered,
            "Emergency response recorded"
        );

        Ok(emergency)
    }

    /// Change an emergency's status on behalf of its creator.
    ///
    /// The creator's room and riders within the alert radius receive
    /// `emergency-update`.
    pub fn update_status(
        &self,
        emergency_id: Uuid,
        status: EmergencyStatus,
        user_id: &str,
    ) -> Result<EmergencyRecord> {
        let emergency = self
            .emergencies
            .update_status(emergency_id, status, user_id, Utc::now())
            .inspect_err(|e| {
                tracing::warn!(%emergency_id, user_id, error = %e, "Status update refused")
            })?;

        let event = ServerEvent::EmergencyUpdate(emergency.clone());
        self.hub.send_to_user(&emergency.user_id, &event);

        for rider in self.riders.find_near(
            &emergency.location,
            Some(&emergency.user_id),
            self.settings.alert_radius,
        ) {
            if let Some(conn_id) = self.riders.get(&rider.user_id).and_then(|r| r.socket_id) {
                self.hub.send(conn_id, event.clone());
            }
        }

        tracing::info!(%emergency_id, status = ?emergency.status, "Emergency status updated");
        Ok(emergency)
    }

    // ─── Housekeeping ────────────────────────────────────────────

    /// Age out stale riders and old non-active emergencies.
    pub fn sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let RiderSweep {
            marked_offline,
            removed,
        } = self.riders.sweep(
            now,
            self.settings.rider_timeout,
            self.settings.rider_retention,
        );
        let emergencies_purged = self
            .emergencies
            .purge(now, self.settings.emergency_retention);

        SweepReport {
            riders_marked_offline: marked_offline,
            riders_removed: removed,
            emergencies_purged,
        }
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            riders: self.riders.counts(),
            emergencies: self.emergencies.counts(),
            connections: self.hub.connection_count(),
        }
    }
}

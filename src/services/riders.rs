// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Volatile directory of riders and their last known positions.

use crate::models::{ConnectionId, Location, LocationUpdate, NearbyRider, RiderRecord};
use crate::services::proximity::within_radius;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Rider counts for health and stats endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiderCounts {
    pub total: usize,
    pub online: usize,
}

/// Outcome of a rider sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiderSweep {
    pub marked_offline: usize,
    pub removed: usize,
}

/// Directory of riders keyed by user ID (last write wins).
#[derive(Debug, Default)]
pub struct RiderDirectory {
    riders: DashMap<String, RiderRecord>,
}

impl RiderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind an existing rider to `conn` and mark it online.
    ///
    /// Returns `false` if the rider has never reported a location.
    pub fn bind_connection(&self, user_id: &str, conn: ConnectionId) -> bool {
        match self.riders.get_mut(user_id) {
            Some(mut record) => {
                record.is_online = true;
                record.socket_id = Some(conn);
                true
            }
            None => false,
        }
    }

    /// Overwrite the rider's record with a new fix. Input must already be validated.
    pub fn update_location(
        &self,
        update: &LocationUpdate,
        conn: Option<ConnectionId>,
        now: DateTime<Utc>,
    ) -> RiderRecord {
        let record = RiderRecord {
            user_id: update.user_id.clone(),
            location: update.location,
            accuracy: update.accuracy,
            last_seen: now,
            is_online: true,
            socket_id: conn,
            reported_at: update.timestamp.and_then(|ts| ts.to_utc()),
        };
        self.riders.insert(update.user_id.clone(), record.clone());
        record
    }

    pub fn get(&self, user_id: &str) -> Option<RiderRecord> {
        self.riders.get(user_id).map(|r| r.value().clone())
    }

    /// Online riders within `radius` meters of the rider's stored position.
    ///
    /// Unknown riders have no position and therefore no neighbours.
    pub fn find_nearby(&self, user_id: &str, radius: f64) -> Vec<NearbyRider> {
        match self.get(user_id) {
            Some(record) => self.find_near(&record.location, Some(user_id), radius),
            None => Vec::new(),
        }
    }

    /// Online riders within `radius` meters of `origin`, nearest first.
    pub fn find_near(
        &self,
        origin: &Location,
        exclude: Option<&str>,
        radius: f64,
    ) -> Vec<NearbyRider> {
        // Snapshot first so no shard lock outlives the scan.
        let online: Vec<RiderRecord> = self
            .riders
            .iter()
            .filter(|r| r.is_online && Some(r.user_id.as_str()) != exclude)
            .map(|r| r.value().clone())
            .collect();

        within_radius(origin.point(), radius, online, |r| Some(r.location.point()))
            .into_iter()
            .map(|(record, distance)| NearbyRider::from_record(&record, distance))
            .collect()
    }

    /// Flag offline the rider currently bound to `conn`, if any.
    ///
    /// Riders that have since moved to another connection stay online.
    pub fn mark_disconnected(&self, conn: ConnectionId) -> Option<String> {
        let mut flagged = None;
        for mut record in self.riders.iter_mut() {
            if record.socket_id == Some(conn) && record.is_online {
                record.is_online = false;
                flagged = Some(record.user_id.clone());
            }
        }
        flagged
    }

    /// Age out stale riders.
    ///
    /// Online riders silent for longer than `timeout` are flagged offline;
    /// offline riders silent for longer than `retention` are dropped.
    pub fn sweep(&self, now: DateTime<Utc>, timeout: Duration, retention: Duration) -> RiderSweep {
        let mut report = RiderSweep::default();

        for mut record in self.riders.iter_mut() {
            if record.is_online && now - record.last_seen > timeout {
                record.is_online = false;
                report.marked_offline += 1;
            }
        }

        let before = self.riders.len();
        self.riders
            .retain(|_, record| record.is_online || now - record.last_seen <= retention);
        report.removed = before.saturating_sub(self.riders.len());

        report
    }

    pub fn counts(&self) -> RiderCounts {
        let mut counts = RiderCounts::default();
        for record in self.riders.iter() {
            counts.total += 1;
            if record.is_online {
                counts.online += 1;
            }
        }
        counts
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! In-memory board of emergency alerts.

use crate::error::AppError;
use crate::models::{
    CreateEmergencyRequest, EmergencyRecord, EmergencyResponse, EmergencyStatus, Location,
    NearbyEmergency, RespondRequest,
};
use crate::services::proximity::within_radius;
use chrono::{DateTime, Duration, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

/// Emergency counts for health and stats endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmergencyCounts {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub responses: usize,
}

/// Errors from emergency board operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Emergency {0} not found")]
    NotFound(Uuid),

    #[error("Only the creator of emergency {0} may change its status")]
    NotCreator(Uuid),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::NotCreator(_) => AppError::Forbidden(err.to_string()),
        }
    }
}

/// Emergencies keyed by their random ID.
#[derive(Debug, Default)]
pub struct EmergencyBoard {
    emergencies: DashMap<Uuid, EmergencyRecord>,
}

impl EmergencyBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new active emergency. Input must already be validated.
    pub fn create(&self, req: &CreateEmergencyRequest, now: DateTime<Utc>) -> EmergencyRecord {
        loop {
            let id = Uuid::new_v4();
            // Never overwrite an existing emergency.
            if let Entry::Vacant(slot) = self.emergencies.entry(id) {
                let record = EmergencyRecord {
                    id,
                    user_id: req.user_id.clone(),
                    kind: req.kind.clone(),
                    message: req.message.clone().unwrap_or_default(),
                    location: req.location,
                    created_at: now,
                    updated_at: now,
                    status: EmergencyStatus::Active,
                    responses: Vec::new(),
                };
                slot.insert(record.clone());
                return record;
            }
            tracing::warn!(%id, "Emergency id collision, regenerating");
        }
    }

    pub fn get(&self, id: Uuid) -> Option<EmergencyRecord> {
        self.emergencies.get(&id).map(|e| e.value().clone())
    }

    /// Append a response and return the updated record.
    pub fn respond(
        &self,
        id: Uuid,
        req: &RespondRequest,
        now: DateTime<Utc>,
    ) -> Result<(EmergencyRecord, EmergencyResponse), StoreError> {
        let mut record = self
            .emergencies
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        let response = EmergencyResponse {
            user_id: req.user_id.clone(),
            response_type: req.response_type.clone(),
            message: req.message.clone(),
            timestamp: now,
        };
        record.responses.push(response.clone());
        record.updated_at = now;

        Ok((record.value().clone(), response))
    }

    /// Change the status. Only the creator may do this.
    pub fn update_status(
        &self,
        id: Uuid,
        status: EmergencyStatus,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<EmergencyRecord, StoreError> {
        let mut record = self
            .emergencies
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        if record.user_id != user_id {
            return Err(StoreError::NotCreator(id));
        }

        if record.status != status {
            record.status = status;
            record.updated_at = now;
        }

        Ok(record.value().clone())
    }

    /// Active emergencies within `radius` meters of `origin`, nearest first.
    pub fn find_near(&self, origin: &Location, radius: f64) -> Vec<NearbyEmergency> {
        let active: Vec<EmergencyRecord> = self
            .emergencies
            .iter()
            .filter(|e| e.is_active())
            .map(|e| e.value().clone())
            .collect();

        within_radius(origin.point(), radius, active, |e| Some(e.location.point()))
            .into_iter()
            .map(|(emergency, distance)| NearbyEmergency { emergency, distance })
            .collect()
    }

    /// Delete non-active emergencies created more than `retention` ago.
    pub fn purge(&self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let before = self.emergencies.len();
        self.emergencies
            .retain(|_, e| e.is_active() || e.created_at >= cutoff);
        before.saturating_sub(self.emergencies.len())
    }

    pub fn counts(&self) -> EmergencyCounts {
        let mut counts = EmergencyCounts::default();
        for e in self.emergencies.iter() {
            counts.total += 1;
            counts.responses += e.responses.len();
            match e.status {
                EmergencyStatus::Active => counts.active += 1,
                EmergencyStatus::Resolved => counts.resolved += 1,
            }
        }
        counts
    }
}

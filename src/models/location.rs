// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Geographic coordinates as exchanged with clients.

use geo::Point;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Location {
    #[serde(alias = "latitude")]
    #[validate(custom(function = "validate_latitude"))]
    pub lat: f64,
    #[serde(alias = "longitude")]
    #[validate(custom(function = "validate_longitude"))]
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    /// Great-circle distance to `other`, in meters.
    pub fn distance_to(&self, other: &Location) -> f64 {
        crate::services::proximity::haversine_distance(self.point(), other.point())
    }
}

// Range checks alone let NaN through.
fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(ValidationError::new("latitude_out_of_range"))
    }
}

fn validate_longitude(lng: f64) -> Result<(), ValidationError> {
    if lng.is_finite() && (-180.0..=180.0).contains(&lng) {
        Ok(())
    } else {
        Err(ValidationError::new("longitude_out_of_range"))
    }
}

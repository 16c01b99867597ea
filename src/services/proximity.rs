// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Great-circle distance and radius filtering.

use geo::Point;
use std::cmp::Ordering;

/// Mean Earth radius used for all distance calculations, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points (x = longitude, y = latitude), in meters.
///
/// No special handling for antipodal or polar points.
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = a.y().to_radians();
    let phi2 = b.y().to_radians();
    let delta_phi = (b.y() - a.y()).to_radians();
    let delta_lambda = (b.x() - a.x()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Keep candidates within `radius` meters of `origin`, nearest first.
///
/// `locate` returns `None` for candidates that should be skipped outright.
pub fn within_radius<T, F>(
    origin: Point<f64>,
    radius: f64,
    candidates: impl IntoIterator<Item = T>,
    locate: F,
) -> Vec<(T, f64)>
where
    F: Fn(&T) -> Option<Point<f64>>,
{
    let mut hits: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let point = locate(&candidate)?;
            let distance = haversine_distance(origin, point);
            (distance <= radius).then_some((candidate, distance))
        })
        .collect();

    hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    hits
}

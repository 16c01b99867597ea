// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Application configuration loaded from environment variables.
//!
//! Every setting has a default so a bare `cargo run` starts a usable
//! development server; a `.env` file is honoured when present.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Default radius for nearby-rider scans, in meters
    pub nearby_radius_meters: f64,
    /// Radius used when alerting riders about an emergency, in meters
    pub emergency_radius_meters: f64,
    /// Silence after which a rider is flagged offline
    pub rider_timeout: Duration,
    /// Age after which non-active emergencies are purged
    pub emergency_retention: Duration,
    /// Interval between sweeps
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            frontend_url: "http://localhost:5173".to_string(),
            nearby_radius_meters: 5_000.0,
            emergency_radius_meters: 10_000.0,
            rider_timeout: Duration::from_secs(5 * 60),
            emergency_retention: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            nearby_radius_meters: parse_var("NEARBY_RADIUS_METERS")?
                .unwrap_or(defaults.nearby_radius_meters),
            emergency_radius_meters: parse_var("EMERGENCY_RADIUS_METERS")?
                .unwrap_or(defaults.emergency_radius_meters),
            rider_timeout: parse_var::<u64>("RIDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rider_timeout),
            emergency_retention: match parse_var::<u64>("EMERGENCY_RETENTION_HOURS")? {
                Some(hours) => hours
                    .checked_mul(60 * 60)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::Invalid("EMERGENCY_RETENTION_HOURS"))?,
                None => defaults.emergency_retention,
            },
            sweep_interval: parse_var::<u64>("SWEEP_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        };

        if !is_positive_radius(config.nearby_radius_meters) {
            return Err(ConfigError::Invalid("NEARBY_RADIUS_METERS"));
        }
        if !is_positive_radius(config.emergency_radius_meters) {
            return Err(ConfigError::Invalid("EMERGENCY_RADIUS_METERS"));
        }
        if config.sweep_interval.is_zero() {
            return Err(ConfigError::Invalid("SWEEP_INTERVAL_SECS"));
        }

        Ok(config)
    }
}

// NaN and infinity parse as f64 but match nothing.
fn is_positive_radius(meters: f64) -> bool {
    meters.is_finite() && meters > 0.0
}

/// Read and parse an optional environment variable.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Rider Saathi: real-time location and emergency broadcast backend
//!
//! Keeps a volatile directory of online riders, computes who is near whom,
//! and pushes location and emergency events to the affected connections.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use chrono::{DateTime, Utc};
use config::Config;
use services::{BroadcastService, ProximitySettings};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub broadcast: Arc<BroadcastService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build fresh state with an empty rider directory and emergency board.
    pub fn new(config: Config) -> Self {
        let broadcast = Arc::new(BroadcastService::new(ProximitySettings::from(&config)));
        Self {
            config,
            broadcast,
            started_at: Utc::now(),
        }
    }
}

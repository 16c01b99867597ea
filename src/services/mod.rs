// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Services module - business logic layer.

pub mod broadcast;
pub mod emergencies;
pub mod hub;
pub mod proximity;
pub mod riders;
pub mod sweeper;

pub use broadcast::{BroadcastService, ProximitySettings, ServiceStats, SweepReport};
pub use emergencies::{EmergencyBoard, StoreError};
pub use hub::{ConnectionHub, Outbound};
pub use riders::RiderDirectory;

// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Middleware modules.

pub mod security;

pub use security::add_security_headers;

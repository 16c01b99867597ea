// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! HTTP route handlers.

pub mod emergency;
pub mod riders;
pub mod stats;
pub mod ws;

use crate::error::AppError;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub active_riders: usize,
    pub active_emergencies: usize,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.broadcast.stats();
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: format_utc_rfc3339(chrono::Utc::now()),
        active_riders: stats.riders.online,
        active_emergencies: stats.emergencies.active,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let frontend_url = state.config.frontend_url.clone();

    let routes = Router::new()
        .route("/api/health", get(health_check))
        .merge(riders::routes())
        .merge(emergency::routes())
        .merge(stats::routes())
        .merge(ws::routes())
        .with_state(state);

    apply_middleware(routes, frontend_url)
}

/// Wrap routes in panic recovery, security headers, CORS and tracing.
fn apply_middleware(routes: Router, frontend_url: String) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url || is_local_dev_origin(origin_str)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// `http://localhost[:port]` or `http://127.0.0.1[:port]`, nothing else.
fn is_local_dev_origin(origin: &str) -> bool {
    let Ok(uri) = origin.parse::<Uri>() else {
        return false;
    };
    uri.scheme_str() == Some("http")
        && matches!(uri.host(), Some("localhost" | "127.0.0.1"))
        && uri.path_and_query().is_none_or(|pq| pq.as_str() == "/")
}

/// Turn a handler panic into the standard 500 body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

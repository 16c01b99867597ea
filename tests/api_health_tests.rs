// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Health and stats endpoint tests.

use axum::http::StatusCode;
use rider_saathi::models::{CreateEmergencyRequest, EmergencyStatus, Location, LocationUpdate};
use tower::ServiceExt;

mod common;

fn update(user_id: &str, lat: f64, lng: f64) -> LocationUpdate {
    LocationUpdate {
        user_id: user_id.to_string(),
        location: Location::new(lat, lng),
        accuracy: None,
        timestamp: None,
    }
}

#[tokio::test]
async fn test_health_on_empty_state() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::get_request("/api/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let body = common::read_json(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["activeRiders"], 0);
    assert_eq!(body["activeEmergencies"], 0);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_health_counts_online_riders_and_active_emergencies() {
    let (app, state) = common::create_test_app();
    let service = &state.broadcast;

    let (conn, _rx) = service.connect();
    service
        .update_location(Some(conn), update("a", 28.6139, 77.2090))
        .unwrap();
    service.update_location(None, update("b", 28.6, 77.2)).unwrap();
    service.disconnect(conn);

    let req = CreateEmergencyRequest {
        user_id: "b".to_string(),
        kind: "breakdown".to_string(),
        message: None,
        location: Location::new(28.6, 77.2),
    };
    let resolved = service.create_emergency(None, &req);
    service.create_emergency(None, &req);
    service
        .update_status(resolved.id, EmergencyStatus::Resolved, "b")
        .unwrap();

    let response = app
        .oneshot(common::get_request("/api/health"))
        .await
        .unwrap();
    let body = common::read_json(response).await;

    assert_eq!(body["activeRiders"], 1);
    assert_eq!(body["activeEmergencies"], 1);
}

#[tokio::test]
async fn test_stats_aggregates() {
    let (app, state) = common::create_test_app();
    let service = &state.broadcast;

    let (conn, _rx) = service.connect();
    service
        .update_location(Some(conn), update("a", 28.6139, 77.2090))
        .unwrap();
    service.update_location(None, update("b", 28.6, 77.2)).unwrap();
    service.update_location(None, update("c", 28.7, 77.3)).unwrap();
    service.disconnect(conn);
    let (_other, _rx2) = service.connect();

    let emergency = service.create_emergency(
        None,
        &CreateEmergencyRequest {
            user_id: "b".to_string(),
            kind: "accident".to_string(),
            message: Some("need help".to_string()),
            location: Location::new(28.6, 77.2),
        },
    );
    service
        .respond(
            emergency.id,
            &rider_saathi::models::RespondRequest {
                user_id: "c".to_string(),
                response_type: "on-my-way".to_string(),
                message: None,
            },
        )
        .unwrap();

    let response = app.oneshot(common::get_request("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;

    assert_eq!(body["riders"]["total"], 3);
    assert_eq!(body["riders"]["online"], 2);
    assert_eq!(body["riders"]["offline"], 1);
    assert_eq!(body["emergencies"]["total"], 1);
    assert_eq!(body["emergencies"]["active"], 1);
    assert_eq!(body["emergencies"]["resolved"], 0);
    assert_eq!(body["emergencies"]["responses"], 1);
    assert_eq!(body["connections"], 1);
    assert!(body["uptimeSeconds"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = common::create_test_app();
    let response = app
        .oneshot(common::get_request("/api/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Emergency endpoint tests.

use axum::http::StatusCode;
use rider_saathi::models::{EmergencyStatus, Location, LocationUpdate, ServerEvent};
use rider_saathi::services::Outbound;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

fn create_body(user_id: &str, lat: f64, lng: f64) -> Value {
    json!({
        "userId": user_id,
        "type": "accident",
        "message": "Bike skidded near the flyover",
        "location": {"lat": lat, "lng": lng}
    })
}

async fn create(app: &axum::Router, user_id: &str, lat: f64, lng: f64) -> Value {
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/emergency/create",
            create_body(user_id, lat, lng),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    common::read_json(response).await
}

#[tokio::test]
async fn test_create_emergency_returns_record() {
    let (app, state) = common::create_test_app();

    let body = create(&app, "u1", 28.6139, 77.2090).await;

    assert_eq!(body["userId"], "u1");
    assert_eq!(body["type"], "accident");
    assert_eq!(body["status"], "active");
    assert_eq!(body["responses"], json!([]));
    assert_eq!(body["location"]["lat"], 28.6139);
    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert!(state.broadcast.emergencies().get(id).is_some());
}

#[tokio::test]
async fn test_create_emergency_alerts_online_riders_in_radius() {
    let (app, state) = common::create_test_app();
    let service = &state.broadcast;

    let (near_conn, mut near_rx) = service.connect();
    let (far_conn, mut far_rx) = service.connect();
    let (creator_conn, mut creator_rx) = service.connect();
    for (conn, user, lat, lng) in [
        (near_conn, "near", 28.6145, 77.2100),
        (far_conn, "far", 19.0760, 72.8777),
        (creator_conn, "u1", 28.6139, 77.2090),
    ] {
        service
            .update_location(
                Some(conn),
                LocationUpdate {
                    user_id: user.to_string(),
                    location: Location::new(lat, lng),
                    accuracy: None,
                    timestamp: None,
                },
            )
            .unwrap();
    }
    while near_rx.try_recv().is_ok() {}
    while far_rx.try_recv().is_ok() {}
    while creator_rx.try_recv().is_ok() {}

    create(&app, "u1", 28.6139, 77.2090).await;

    match near_rx.try_recv().unwrap() {
        Outbound::Event(ServerEvent::EmergencyAlert(alert)) => {
            assert_eq!(alert.emergency.user_id, "u1");
            assert!(alert.distance < 200.0);
        }
        other => panic!("unexpected outbound {:?}", other),
    }
    assert!(far_rx.try_recv().is_err());
    assert!(creator_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_create_emergency_rejects_invalid_body() {
    let bodies = [
        json!({"userId": "u1", "location": {"lat": 28.6, "lng": 77.2}}),
        json!({"userId": "u1", "type": "accident", "location": {"lat": 28.6, "lng": 181.0}}),
        json!({"userId": "", "type": "accident", "location": {"lat": 28.6, "lng": 77.2}}),
    ];

    for body in bodies {
        let (app, state) = common::create_test_app();
        let response = app
            .oneshot(common::json_request("POST", "/api/emergency/create", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(state.broadcast.stats().emergencies.total, 0);
    }
}

#[tokio::test]
async fn test_nearby_emergencies_active_only_and_sorted() {
    let (app, state) = common::create_test_app();

    let far = create(&app, "u1", 28.6300, 77.2200).await;
    let near = create(&app, "u2", 28.6145, 77.2100).await;
    let resolved = create(&app, "u3", 28.6140, 77.2091).await;
    create(&app, "u4", 19.0760, 72.8777).await;

    let resolved_id: Uuid = resolved["id"].as_str().unwrap().parse().unwrap();
    state
        .broadcast
        .update_status(resolved_id, EmergencyStatus::Resolved, "u3")
        .unwrap();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/emergency/nearby",
            json!({"location": {"lat": 28.6139, "lng": 77.2090}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    let list = body.as_array().unwrap();
    let ids: Vec<&Value> = list.iter().map(|e| &e["id"]).collect();
    assert_eq!(ids, vec![&near["id"], &far["id"]]);
    assert!(list[0]["distance"].as_f64().unwrap() < list[1]["distance"].as_f64().unwrap());
    assert_eq!(list[0]["type"], "accident");
}

#[tokio::test]
async fn test_respond_appends_and_notifies_creator() {
    let (app, state) = common::create_test_app();
    let created = create(&app, "u1", 28.6139, 77.2090).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (conn, mut rx) = state.broadcast.connect();
    state.broadcast.join_user_room(conn, "u1");

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/emergency/{id}/respond"),
            json!({"userId": "u2", "responseType": "on-my-way", "message": "5 minutes"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["userId"], "u2");
    assert_eq!(responses[0]["responseType"], "on-my-way");
    assert_eq!(responses[0]["message"], "5 minutes");

    match rx.try_recv().unwrap() {
        Outbound::Event(ServerEvent::EmergencyResponse(notice)) => {
            assert_eq!(notice.emergency_id.to_string(), id);
            assert_eq!(notice.user_id, "u2");
            assert_eq!(notice.response_type, "on-my-way");
        }
        other => panic!("unexpected outbound {:?}", other),
    }
}

#[tokio::test]
async fn test_respond_unknown_emergency_is_404() {
    for id in [Uuid::new_v4().to_string(), "does-not-exist".to_string()] {
        let (app, _) = common::create_test_app();
        let response = app
            .oneshot(common::json_request(
                "POST",
                &format!("/api/emergency/{id}/respond"),
                json!({"userId": "u2", "responseType": "on-my-way"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = common::read_json(response).await;
        assert_eq!(body["error"], "not_found");
    }
}

#[tokio::test]
async fn test_status_update_by_non_creator_is_forbidden() {
    let (app, state) = common::create_test_app();
    let created = create(&app, "u1", 28.6139, 77.2090).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(common::json_request(
            "PATCH",
            &format!("/api/emergency/{id}"),
            json!({"status": "resolved", "userId": "u2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = state
        .broadcast
        .emergencies()
        .get(id.parse().unwrap())
        .unwrap();
    assert_eq!(stored.status, EmergencyStatus::Active);
}

#[tokio::test]
async fn test_status_update_by_creator() {
    let (app, state) = common::create_test_app();
    let created = create(&app, "u1", 28.6139, 77.2090).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (conn, mut rx) = state.broadcast.connect();
    state.broadcast.join_user_room(conn, "u1");

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PATCH",
            &format!("/api/emergency/{id}"),
            json!({"status": "resolved", "userId": "u1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["status"], "resolved");

    match rx.try_recv().unwrap() {
        Outbound::Event(ServerEvent::EmergencyUpdate(record)) => {
            assert_eq!(record.status, EmergencyStatus::Resolved);
        }
        other => panic!("unexpected outbound {:?}", other),
    }

    // Resolved emergencies drop out of nearby queries.
    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/emergency/nearby",
            json!({"location": {"lat": 28.6139, "lng": 77.2090}}),
        ))
        .await
        .unwrap();
    let body = common::read_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status() {
    let (app, _) = common::create_test_app();
    let created = create(&app, "u1", 28.6139, 77.2090).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(common::json_request(
            "PATCH",
            &format!("/api/emergency/{id}"),
            json!({"status": "cancelled", "userId": "u1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

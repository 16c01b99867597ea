// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Real-time channel over WebSocket.
//!
//! Each connection gets two halves: a sender task that drains the
//! connection's outbound queue into the socket, and the receive loop on the
//! upgrade task that parses, validates and dispatches client events.
//! Malformed events are logged and dropped; the client gets no feedback.

use crate::models::{ClientEvent, ConnectionId};
use crate::services::{BroadcastService, Outbound};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws", get(ws_handler))
}

/// Upgrade the connection to WebSocket.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let service = state.broadcast.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: Arc<BroadcastService>) {
    let (conn_id, mut rx) = service.connect();
    tracing::info!(%conn_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let message = match item {
                Outbound::Event(event) => match serde_json::to_string(&event) {
                    Ok(text) => Message::Text(text.into()),
                    Err(e) => {
                        tracing::warn!(%conn_id, event = event.name(), error = %e, "Failed to encode event");
                        continue;
                    }
                },
                Outbound::Ping => Message::Ping(Bytes::new()),
                Outbound::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            };

            if sink.send(message).await.is_err() {
                tracing::debug!(%conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => dispatch(&service, conn_id, text.as_str()),
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                tracing::debug!(%conn_id, "Ignoring binary frame");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    service.disconnect(conn_id);
    send_task.abort();
    tracing::info!(%conn_id, "WebSocket disconnected");
}

/// Parse, validate and route one client frame.
pub(crate) fn dispatch(service: &BroadcastService, conn_id: ConnectionId, raw: &str) {
    let event: ClientEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(%conn_id, error = %e, "Dropping malformed client event");
            return;
        }
    };

    if let Err(e) = event.validate() {
        tracing::warn!(%conn_id, event = event.name(), error = %e, "Dropping invalid client event");
        return;
    }

    match event {
        ClientEvent::JoinUserRoom(user_id) => service.join_user_room(conn_id, &user_id),
        ClientEvent::LocationUpdate(update) => {
            if let Err(e) = service.update_location(Some(conn_id), update) {
                tracing::warn!(%conn_id, error = %e, "Location update rejected");
            }
        }
        ClientEvent::EmergencyBroadcast(req) => {
            service.create_emergency(Some(conn_id), &req);
        }
        ClientEvent::EmergencyRespond(req) => {
            if let Err(e) = service.respond(req.emergency_id, &req.response) {
                tracing::warn!(%conn_id, emergency_id = %req.emergency_id, error = %e, "Response rejected");
            }
        }
        ClientEvent::EmergencyStatus(req) => {
            // Refusals are already logged by the service.
            let _ = service.update_status(req.emergency_id, req.status, &req.user_id);
        }
    }
}

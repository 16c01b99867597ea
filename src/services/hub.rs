// SPDX-License-Identifier: MIT
// Copyright 2026 Rider Saathi contributors

//! Registry of live real-time connections and their outbound queues.
//!
//! Business logic only enqueues typed events here; each connection's sender
//! task owns serialisation and the socket itself.

use crate::models::{ConnectionId, ServerEvent};
use dashmap::DashMap;
use tokio::sync::mpsc;

/// Items queued for delivery to one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Event(ServerEvent),
    Ping,
    Close,
}

pub type OutboundSender = mpsc::UnboundedSender<Outbound>;
pub type OutboundReceiver = mpsc::UnboundedReceiver<Outbound>;

/// Metadata for a single connection.
#[derive(Debug)]
pub struct Connection {
    /// Set once the client joins its user room.
    pub user_id: Option<String>,
    pub sender: OutboundSender,
}

/// All live connections.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    connections: DashMap<ConnectionId, Connection>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiving half of its queue.
    pub fn add(&self, conn_id: ConnectionId) -> OutboundReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(
            conn_id,
            Connection {
                user_id: None,
                sender: tx,
            },
        );
        rx
    }

    /// Put a connection in a user's room. Returns `false` for unknown connections.
    pub fn join(&self, conn_id: ConnectionId, user_id: &str) -> bool {
        match self.connections.get_mut(&conn_id) {
            Some(mut conn) => {
                if conn.user_id.as_deref() != Some(user_id) {
                    conn.user_id = Some(user_id.to_string());
                }
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, conn_id: ConnectionId) -> Option<Connection> {
        self.connections.remove(&conn_id).map(|(_, conn)| conn)
    }

    /// Queue an event for one connection.
    ///
    /// Returns `false` if the connection is gone or its receiver was dropped.
    pub fn send(&self, conn_id: ConnectionId, event: ServerEvent) -> bool {
        match self.connections.get(&conn_id) {
            Some(conn) => conn.sender.send(Outbound::Event(event)).is_ok(),
            None => false,
        }
    }

    /// Queue an event for every connection in a user's room.
    ///
    /// Returns the number of connections the event was queued for.
    pub fn send_to_user(&self, user_id: &str, event: &ServerEvent) -> usize {
        self.connections
            .iter()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .filter(|c| c.sender.send(Outbound::Event(event.clone())).is_ok())
            .count()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Queue a Ping for every connection.
    pub fn ping_all(&self) {
        for conn in self.connections.iter() {
            let _ = conn.sender.send(Outbound::Ping);
        }
    }

    /// Queue a Close for every connection, then forget them all.
    pub fn shutdown_all(&self) {
        let count = self.connections.len();
        for conn in self.connections.iter() {
            let _ = conn.sender.send(Outbound::Close);
        }
        self.connections.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn event() -> ServerEvent {
        ServerEvent::RidersNearby(vec![])
    }

    #[test]
    fn test_send_to_user_reaches_every_room_member() {
        let hub = ConnectionHub::new();
        let (a1, a2, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut rx_a1 = hub.add(a1);
        let mut rx_a2 = hub.add(a2);
        let mut rx_b = hub.add(b);
        hub.join(a1, "alice");
        hub.join(a2, "alice");
        hub.join(b, "bob");

        assert_eq!(hub.send_to_user("alice", &event()), 2);
        assert_eq!(rx_a1.try_recv().unwrap(), Outbound::Event(event()));
        assert_eq!(rx_a2.try_recv().unwrap(), Outbound::Event(event()));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_send_to_dropped_receiver() {
        let hub = ConnectionHub::new();
        let conn = Uuid::new_v4();
        drop(hub.add(conn));
        assert!(!hub.send(conn, event()));
        assert!(!hub.send(Uuid::new_v4(), event()));
    }

    #[test]
    fn test_join_unknown_connection() {
        let hub = ConnectionHub::new();
        assert!(!hub.join(Uuid::new_v4(), "alice"));
    }

    #[test]
    fn test_shutdown_all_sends_close() {
        let hub = ConnectionHub::new();
        let conn = Uuid::new_v4();
        let mut rx = hub.add(conn);
        hub.ping_all();
        hub.shutdown_all();

        assert_eq!(rx.try_recv().unwrap(), Outbound::Ping);
        assert_eq!(rx.try_recv().unwrap(), Outbound::Close);
        assert_eq!(hub.connection_count(), 0);
    }
}

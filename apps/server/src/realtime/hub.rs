//! Connection registry for trip-scoped event broadcast.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use tripsync_core::events::DomainEvent;

pub type ConnectionId = u64;

struct ConnectionScope {
    user_id: Option<String>,
    trip_id: Option<String>,
    sender: UnboundedSender<String>,
}

/// In-memory registry of live WebSocket connections.
///
/// Each connection registers on upgrade, gains a scope when the client
/// announces itself, and is removed when its socket task exits. Nothing is
/// persisted: after a restart the registry refills as clients reconnect
/// and re-announce.
#[derive(Default)]
pub struct RealtimeHub {
    connections: Mutex<HashMap<ConnectionId, ConnectionScope>>,
    next_id: AtomicU64,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh connection with no scope yet.
    pub fn register(&self, sender: UnboundedSender<String>) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().unwrap().insert(
            id,
            ConnectionScope {
                user_id: None,
                trip_id: None,
                sender,
            },
        );
        id
    }

    /// Scopes a connection to a user and, when given, a trip.
    ///
    /// A missing or blank trip id stores the user-only scope; the client
    /// simply receives nothing until it announces a trip. Never an error.
    pub fn assign(&self, id: ConnectionId, user_id: String, trip_id: Option<String>) {
        let trip_id = trip_id.filter(|t| !t.trim().is_empty());
        if trip_id.is_none() {
            warn!(connection = id, user = %user_id, "announce without trip id; connection stays unscoped");
        }
        if let Some(scope) = self.connections.lock().unwrap().get_mut(&id) {
            scope.user_id = Some(user_id);
            scope.trip_id = trip_id;
        }
    }

    /// Drops a connection from the registry. Safe to call twice.
    pub fn remove(&self, id: ConnectionId) {
        self.connections.lock().unwrap().remove(&id);
    }

    /// Sends the event to every open connection scoped to `trip_id`.
    ///
    /// The event is serialized once; connections whose scope does not match
    /// or whose channel is closed are skipped silently. Dead senders are
    /// left for the owning socket task to clean up on exit.
    pub fn broadcast(&self, trip_id: &str, event: &DomainEvent) {
        let message = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(e) => {
                warn!("failed to serialize domain event: {}", e);
                return;
            }
        };
        let connections = self.connections.lock().unwrap();
        for scope in connections.values() {
            if scope.trip_id.as_deref() == Some(trip_id) {
                let _ = scope.sender.send(message.clone());
            }
        }
    }

    #[cfg(test)]
    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}

//! Bridges core domain events into the realtime hub.

use std::sync::Arc;

use tripsync_core::events::{DomainEvent, DomainEventSink};

use super::hub::RealtimeHub;

/// Event sink that fans every committed domain event out to the clients
/// viewing the affected trip.
pub struct RealtimeEventSink {
    hub: Arc<RealtimeHub>,
}

impl RealtimeEventSink {
    pub fn new(hub: Arc<RealtimeHub>) -> Self {
        Self { hub }
    }
}

impl DomainEventSink for RealtimeEventSink {
    fn emit(&self, event: DomainEvent) {
        let trip_id = event.trip_id().to_string();
        self.hub.broadcast(&trip_id, &event);
    }
}

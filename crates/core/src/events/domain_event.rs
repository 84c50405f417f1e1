//! Domain event types.

use serde::{Deserialize, Serialize};

use crate::schedule::InviteStatus;

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about committed trip data changes. The
/// serialized form is the realtime wire shape pushed to clients viewing
/// the affected trip, so every variant carries the `trip_id` the realtime
/// hub scopes its fan-out by.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A proposal was converted into a scheduled activity.
    ActivityCreated {
        trip_id: String,
        activity_id: String,
        proposal_id: String,
        created_by: String,
    },

    /// An invite changed status in response to an RSVP.
    InviteUpdated {
        trip_id: String,
        activity_id: String,
        user_id: String,
        status: InviteStatus,
    },

    /// A waitlisted invite was promoted into a freed slot.
    WaitlistPromoted {
        trip_id: String,
        activity_id: String,
        user_id: String,
    },
}

impl DomainEvent {
    /// Creates an ActivityCreated event.
    pub fn activity_created(
        trip_id: String,
        activity_id: String,
        proposal_id: String,
        created_by: String,
    ) -> Self {
        Self::ActivityCreated {
            trip_id,
            activity_id,
            proposal_id,
            created_by,
        }
    }

    /// Creates an InviteUpdated event.
    pub fn invite_updated(
        trip_id: String,
        activity_id: String,
        user_id: String,
        status: InviteStatus,
    ) -> Self {
        Self::InviteUpdated {
            trip_id,
            activity_id,
            user_id,
            status,
        }
    }

    /// Creates a WaitlistPromoted event.
    pub fn waitlist_promoted(trip_id: String, activity_id: String, user_id: String) -> Self {
        Self::WaitlistPromoted {
            trip_id,
            activity_id,
            user_id,
        }
    }

    /// The trip whose viewers should receive this event.
    pub fn trip_id(&self) -> &str {
        match self {
            Self::ActivityCreated { trip_id, .. }
            | Self::InviteUpdated { trip_id, .. }
            | Self::WaitlistPromoted { trip_id, .. } => trip_id,
        }
    }
}

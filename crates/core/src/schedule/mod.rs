//! Schedule module - scheduled activities, invites, and RSVP handling.
//!
//! Owns the capacity-aware invite state machine: RSVP transitions, the
//! silent downgrade to `waitlisted` when an activity is full, and FIFO
//! promotion of the earliest waitlisted invite when a slot frees.

mod rsvp;
mod rsvp_service;
mod schedule_model;
mod schedule_traits;

pub use rsvp::{resolve_rsvp, RsvpDecision};
pub use rsvp_service::RsvpService;
pub use schedule_model::{
    ActivityKind, ActivityStatus, Invite, InviteSeed, InviteStatus, NewScheduledActivity,
    RsvpRequest, RsvpUpdate, ScheduledActivity,
};
pub use schedule_traits::{RsvpServiceTrait, ScheduleRepositoryTrait};

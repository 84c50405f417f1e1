use crate::errors::Result;
use crate::schedule::schedule_model::{
    Invite, RsvpRequest, RsvpUpdate, ScheduledActivity,
};
use async_trait::async_trait;

/// Trait for schedule repository operations.
///
/// `apply_rsvp` runs the whole RSVP algorithm as one transaction: load the
/// activity and invite, count accepted invites, resolve the transition, and
/// when a slot frees, promote the earliest waitlisted invite before commit.
/// No intermediate state is observable from outside the transaction.
#[async_trait]
pub trait ScheduleRepositoryTrait: Send + Sync {
    fn get_activity(&self, activity_id: &str) -> Result<ScheduledActivity>;
    fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<ScheduledActivity>>;
    fn get_invites(&self, activity_id: &str) -> Result<Vec<Invite>>;
    async fn apply_rsvp(
        &self,
        activity_id: String,
        user_id: String,
        requested: RsvpRequest,
    ) -> Result<RsvpUpdate>;
}

/// Trait for RSVP service operations.
#[async_trait]
pub trait RsvpServiceTrait: Send + Sync {
    fn get_activity(&self, activity_id: &str) -> Result<ScheduledActivity>;
    fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<ScheduledActivity>>;
    fn get_invites(&self, activity_id: &str) -> Result<Vec<Invite>>;
    async fn set_invite_status(
        &self,
        activity_id: &str,
        user_id: &str,
        requested: RsvpRequest,
    ) -> Result<RsvpUpdate>;
}

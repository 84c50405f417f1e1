use crate::errors::Result;
use crate::notifications::notifications_model::{NewNotification, Notification};
use crate::schedule::{InviteStatus, ScheduledActivity};
use async_trait::async_trait;

/// Trait for notification repository operations.
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    async fn create_notifications(&self, new_notifications: Vec<NewNotification>) -> Result<usize>;
    fn get_notifications_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>>;
}

/// Trait for notification dispatch.
///
/// Callers invoke these only after their own transaction has committed, and
/// must catch and log any returned error instead of propagating it.
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Records an invite notification for each recipient of a freshly
    /// converted activity. Returns the number of rows written.
    async fn notify_activity_created(
        &self,
        activity: &ScheduledActivity,
        recipients: &[String],
    ) -> Result<usize>;

    /// Records an accept/decline notification for the activity organizer.
    /// No-op when the responder is the organizer, or for statuses that do
    /// not map to a notification (pending, waitlisted).
    async fn notify_rsvp(
        &self,
        activity: &ScheduledActivity,
        responder_id: &str,
        status: InviteStatus,
    ) -> Result<usize>;

    /// Records a promotion notification for the promoted member.
    async fn notify_waitlist_promoted(
        &self,
        activity: &ScheduledActivity,
        user_id: &str,
    ) -> Result<usize>;

    fn get_notifications_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>>;
}

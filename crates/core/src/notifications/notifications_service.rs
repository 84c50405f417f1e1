use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::notifications_model::{NewNotification, Notification, NotificationKind};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::errors::Result;
use crate::schedule::{InviteStatus, ScheduledActivity};

/// Service mapping committed domain changes to per-recipient notification
/// rows.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn activity_payload(activity: &ScheduledActivity) -> serde_json::Value {
        json!({
            "activityId": activity.id,
            "tripId": activity.trip_id,
            "activityName": activity.name,
        })
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn notify_activity_created(
        &self,
        activity: &ScheduledActivity,
        recipients: &[String],
    ) -> Result<usize> {
        let payload = Self::activity_payload(activity);
        let rows: Vec<NewNotification> = recipients
            .iter()
            .map(|user_id| NewNotification {
                user_id: user_id.clone(),
                kind: NotificationKind::InviteReceived,
                payload: payload.clone(),
            })
            .collect();

        if rows.is_empty() {
            return Ok(0);
        }
        self.repository.create_notifications(rows).await
    }

    async fn notify_rsvp(
        &self,
        activity: &ScheduledActivity,
        responder_id: &str,
        status: InviteStatus,
    ) -> Result<usize> {
        let kind = match status {
            InviteStatus::Accepted => NotificationKind::InviteAccepted,
            InviteStatus::Declined => NotificationKind::InviteDeclined,
            // Downgrades and seeds carry no organizer notification.
            InviteStatus::Pending | InviteStatus::Waitlisted => return Ok(0),
        };
        if responder_id == activity.created_by {
            return Ok(0);
        }

        let mut payload = Self::activity_payload(activity);
        payload["userId"] = json!(responder_id);

        self.repository
            .create_notifications(vec![NewNotification {
                user_id: activity.created_by.clone(),
                kind,
                payload,
            }])
            .await
    }

    async fn notify_waitlist_promoted(
        &self,
        activity: &ScheduledActivity,
        user_id: &str,
    ) -> Result<usize> {
        self.repository
            .create_notifications(vec![NewNotification {
                user_id: user_id.to_string(),
                kind: NotificationKind::WaitlistPromoted,
                payload: Self::activity_payload(activity),
            }])
            .await
    }

    fn get_notifications_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>> {
        self.repository.get_notifications_for_user(user_id, limit)
    }
}

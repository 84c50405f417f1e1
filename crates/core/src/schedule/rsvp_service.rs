use log::error;
use std::sync::Arc;

use async_trait::async_trait;

use super::schedule_model::{Invite, RsvpRequest, RsvpUpdate, ScheduledActivity};
use super::schedule_traits::{RsvpServiceTrait, ScheduleRepositoryTrait};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::notifications::NotificationServiceTrait;
use crate::trips::TripRepositoryTrait;

/// Service for member RSVP responses on scheduled activities.
///
/// Validates the responder against the trip roster, then hands the
/// transition to the repository, which runs capacity resolution and
/// waitlist promotion inside one transaction. Notifications and domain
/// events fire only after that transaction has committed.
pub struct RsvpService {
    schedule_repository: Arc<dyn ScheduleRepositoryTrait>,
    trip_repository: Arc<dyn TripRepositoryTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl RsvpService {
    pub fn new(
        schedule_repository: Arc<dyn ScheduleRepositoryTrait>,
        trip_repository: Arc<dyn TripRepositoryTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        Self {
            schedule_repository,
            trip_repository,
            notification_service,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink for emitting InviteUpdated and
    /// WaitlistPromoted events.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }
}

#[async_trait]
impl RsvpServiceTrait for RsvpService {
    fn get_activity(&self, activity_id: &str) -> Result<ScheduledActivity> {
        self.schedule_repository.get_activity(activity_id)
    }

    fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<ScheduledActivity>> {
        self.schedule_repository.get_activities_by_trip(trip_id)
    }

    fn get_invites(&self, activity_id: &str) -> Result<Vec<Invite>> {
        self.schedule_repository.get_invites(activity_id)
    }

    async fn set_invite_status(
        &self,
        activity_id: &str,
        user_id: &str,
        requested: RsvpRequest,
    ) -> Result<RsvpUpdate> {
        let activity = self.schedule_repository.get_activity(activity_id)?;

        if !self.trip_repository.is_member(&activity.trip_id, user_id)? {
            return Err(Error::Membership(format!(
                "User {} is not a member of trip {}",
                user_id, activity.trip_id
            )));
        }

        let update = self
            .schedule_repository
            .apply_rsvp(activity_id.to_string(), user_id.to_string(), requested)
            .await?;

        // Everything below runs after commit and must not surface failures
        // to the responder.
        if update.changed() {
            if let Err(e) = self
                .notification_service
                .notify_rsvp(&activity, user_id, update.invite.status)
                .await
            {
                error!(
                    "Failed to record RSVP notification for activity {}: {}",
                    activity.id, e
                );
            }
            self.event_sink.emit(DomainEvent::invite_updated(
                activity.trip_id.clone(),
                activity.id.clone(),
                user_id.to_string(),
                update.invite.status,
            ));
        }

        if let Some(promoted) = &update.promoted {
            if let Err(e) = self
                .notification_service
                .notify_waitlist_promoted(&activity, &promoted.user_id)
                .await
            {
                error!(
                    "Failed to record promotion notification for activity {}: {}",
                    activity.id, e
                );
            }
            self.event_sink.emit(DomainEvent::waitlist_promoted(
                activity.trip_id.clone(),
                activity.id.clone(),
                promoted.user_id.clone(),
            ));
        }

        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DatabaseError;
    use crate::events::MockDomainEventSink;
    use crate::notifications::{NewNotification, Notification, NotificationRepositoryTrait};
    use crate::schedule::rsvp::resolve_rsvp;
    use crate::schedule::schedule_model::{ActivityKind, ActivityStatus, InviteStatus};
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::{Mutex, RwLock};

    // ============== Mock Repositories ==============

    struct MockScheduleRepository {
        activities: HashMap<String, ScheduledActivity>,
        invites: RwLock<Vec<Invite>>,
    }

    impl MockScheduleRepository {
        fn new(activities: Vec<ScheduledActivity>, invites: Vec<Invite>) -> Self {
            Self {
                activities: activities.into_iter().map(|a| (a.id.clone(), a)).collect(),
                invites: RwLock::new(invites),
            }
        }

        fn invite_status(&self, user_id: &str) -> InviteStatus {
            self.invites
                .read()
                .unwrap()
                .iter()
                .find(|i| i.user_id == user_id)
                .unwrap()
                .status
        }
    }

    #[async_trait]
    impl ScheduleRepositoryTrait for MockScheduleRepository {
        fn get_activity(&self, activity_id: &str) -> Result<ScheduledActivity> {
            self.activities
                .get(activity_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(activity_id.to_string())))
        }

        fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<ScheduledActivity>> {
            Ok(self
                .activities
                .values()
                .filter(|a| a.trip_id == trip_id)
                .cloned()
                .collect())
        }

        fn get_invites(&self, activity_id: &str) -> Result<Vec<Invite>> {
            Ok(self
                .invites
                .read()
                .unwrap()
                .iter()
                .filter(|i| i.activity_id == activity_id)
                .cloned()
                .collect())
        }

        async fn apply_rsvp(
            &self,
            activity_id: String,
            user_id: String,
            requested: RsvpRequest,
        ) -> Result<RsvpUpdate> {
            let activity = self.get_activity(&activity_id)?;
            let mut invites = self.invites.write().unwrap();

            let accepted_count = invites
                .iter()
                .filter(|i| i.activity_id == activity_id && i.status == InviteStatus::Accepted)
                .count() as i64;

            let position = invites
                .iter()
                .position(|i| i.activity_id == activity_id && i.user_id == user_id)
                .ok_or_else(|| {
                    Error::Membership(format!("User {} has no invite", user_id))
                })?;

            let previous_status = invites[position].status;
            let decision = resolve_rsvp(
                previous_status,
                requested,
                accepted_count,
                activity.max_capacity,
            );

            invites[position].status = decision.next;
            invites[position].updated_at = Utc::now();
            if decision.joins_waitlist {
                invites[position].created_at = Utc::now();
            }
            let updated = invites[position].clone();

            let promoted = if decision.frees_slot {
                invites
                    .iter_mut()
                    .filter(|i| {
                        i.activity_id == activity_id && i.status == InviteStatus::Waitlisted
                    })
                    .min_by_key(|i| i.created_at)
                    .map(|first| {
                        first.status = InviteStatus::Accepted;
                        first.updated_at = Utc::now();
                        first.clone()
                    })
            } else {
                None
            };

            Ok(RsvpUpdate {
                invite: updated,
                previous_status,
                promoted,
            })
        }
    }

    struct MockTripRepository {
        members: Vec<(String, String)>,
    }

    impl TripRepositoryTrait for MockTripRepository {
        fn get_trip(&self, _trip_id: &str) -> Result<crate::trips::Trip> {
            unimplemented!()
        }

        fn get_member_ids(&self, trip_id: &str) -> Result<Vec<String>> {
            Ok(self
                .members
                .iter()
                .filter(|(t, _)| t == trip_id)
                .map(|(_, u)| u.clone())
                .collect())
        }

        fn is_member(&self, trip_id: &str, user_id: &str) -> Result<bool> {
            Ok(self
                .members
                .iter()
                .any(|(t, u)| t == trip_id && u == user_id))
        }
    }

    struct MockNotificationService {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl MockNotificationService {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationServiceTrait for MockNotificationService {
        async fn notify_activity_created(
            &self,
            _activity: &ScheduledActivity,
            _recipients: &[String],
        ) -> Result<usize> {
            unimplemented!()
        }

        async fn notify_rsvp(
            &self,
            _activity: &ScheduledActivity,
            responder_id: &str,
            status: InviteStatus,
        ) -> Result<usize> {
            // Mirror the real dispatcher: downgrades and seeds carry no
            // organizer notification.
            if matches!(status, InviteStatus::Pending | InviteStatus::Waitlisted) {
                return Ok(0);
            }
            if self.fail {
                return Err(Error::Unexpected("notification store down".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(format!("rsvp:{}:{}", responder_id, status.as_str()));
            Ok(1)
        }

        async fn notify_waitlist_promoted(
            &self,
            _activity: &ScheduledActivity,
            user_id: &str,
        ) -> Result<usize> {
            if self.fail {
                return Err(Error::Unexpected("notification store down".to_string()));
            }
            self.calls
                .lock()
                .unwrap()
                .push(format!("promoted:{}", user_id));
            Ok(1)
        }

        fn get_notifications_for_user(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<Notification>> {
            unimplemented!()
        }
    }

    #[allow(dead_code)]
    struct UnusedNotificationRepository;

    #[async_trait]
    impl NotificationRepositoryTrait for UnusedNotificationRepository {
        async fn create_notifications(&self, _rows: Vec<NewNotification>) -> Result<usize> {
            unimplemented!()
        }

        fn get_notifications_for_user(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<Notification>> {
            unimplemented!()
        }
    }

    // ============== Fixtures ==============

    fn activity(max_capacity: Option<i32>) -> ScheduledActivity {
        let now = Utc::now();
        ScheduledActivity {
            id: "act1".to_string(),
            trip_id: "trip1".to_string(),
            name: "Louvre guided tour".to_string(),
            description: None,
            start_time: None,
            end_time: None,
            location_city: Some("Paris".to_string()),
            location_country: Some("France".to_string()),
            cost: None,
            currency: None,
            max_capacity,
            status: ActivityStatus::Scheduled,
            kind: ActivityKind::Scheduled,
            created_by: "organizer".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn invite(user_id: &str, status: InviteStatus, age_minutes: i64) -> Invite {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Invite {
            id: format!("inv-{}", user_id),
            activity_id: "act1".to_string(),
            user_id: user_id.to_string(),
            status,
            created_at: created,
            updated_at: created,
        }
    }

    fn service_with(
        repo: Arc<MockScheduleRepository>,
        members: Vec<(&str, &str)>,
        notifications: Arc<MockNotificationService>,
        sink: Arc<MockDomainEventSink>,
    ) -> RsvpService {
        let trips = Arc::new(MockTripRepository {
            members: members
                .into_iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
        });
        RsvpService::new(repo, trips, notifications).with_event_sink(sink)
    }

    // ============== Tests ==============

    #[tokio::test]
    async fn missing_activity_is_not_found() {
        let repo = Arc::new(MockScheduleRepository::new(vec![], vec![]));
        let service = service_with(
            repo,
            vec![("trip1", "member1")],
            Arc::new(MockNotificationService::new()),
            Arc::new(MockDomainEventSink::new()),
        );

        let result = service
            .set_invite_status("ghost", "member1", RsvpRequest::Accepted)
            .await;

        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn non_member_is_rejected_before_any_write() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(None)],
            vec![invite("stranger", InviteStatus::Pending, 10)],
        ));
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo.clone(),
            vec![("trip1", "member1")],
            Arc::new(MockNotificationService::new()),
            sink.clone(),
        );

        let result = service
            .set_invite_status("act1", "stranger", RsvpRequest::Accepted)
            .await;

        assert!(matches!(result, Err(Error::Membership(_))));
        assert_eq!(repo.invite_status("stranger"), InviteStatus::Pending);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn member_without_invite_is_rejected() {
        let repo = Arc::new(MockScheduleRepository::new(vec![activity(None)], vec![]));
        let service = service_with(
            repo,
            vec![("trip1", "member1")],
            Arc::new(MockNotificationService::new()),
            Arc::new(MockDomainEventSink::new()),
        );

        let result = service
            .set_invite_status("act1", "member1", RsvpRequest::Accepted)
            .await;

        assert!(matches!(result, Err(Error::Membership(_))));
    }

    #[tokio::test]
    async fn accept_emits_invite_updated_and_notifies_organizer() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(None)],
            vec![invite("member1", InviteStatus::Pending, 10)],
        ));
        let notifications = Arc::new(MockNotificationService::new());
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo,
            vec![("trip1", "member1")],
            notifications.clone(),
            sink.clone(),
        );

        let update = service
            .set_invite_status("act1", "member1", RsvpRequest::Accepted)
            .await
            .unwrap();

        assert_eq!(update.invite.status, InviteStatus::Accepted);
        assert!(update.promoted.is_none());
        assert_eq!(notifications.calls(), vec!["rsvp:member1:accepted"]);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DomainEvent::InviteUpdated { user_id, status, .. }
                if user_id == "member1" && *status == InviteStatus::Accepted
        ));
    }

    #[tokio::test]
    async fn accept_into_full_activity_downgrades_without_error() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(Some(2))],
            vec![
                invite("organizer", InviteStatus::Accepted, 30),
                invite("member1", InviteStatus::Accepted, 20),
                invite("member2", InviteStatus::Pending, 10),
            ],
        ));
        let notifications = Arc::new(MockNotificationService::new());
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo.clone(),
            vec![("trip1", "member2")],
            notifications.clone(),
            sink.clone(),
        );

        let update = service
            .set_invite_status("act1", "member2", RsvpRequest::Accepted)
            .await
            .unwrap();

        assert_eq!(update.invite.status, InviteStatus::Waitlisted);
        assert_eq!(repo.invite_status("member2"), InviteStatus::Waitlisted);
        // Downgrade is visible to the trip but carries no organizer
        // notification.
        assert!(notifications.calls().is_empty());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DomainEvent::InviteUpdated { status, .. } if *status == InviteStatus::Waitlisted
        ));
    }

    #[tokio::test]
    async fn decline_promotes_earliest_waitlisted_invite() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(Some(2))],
            vec![
                invite("organizer", InviteStatus::Accepted, 40),
                invite("member1", InviteStatus::Accepted, 30),
                invite("member2", InviteStatus::Waitlisted, 20),
                invite("member3", InviteStatus::Waitlisted, 10),
            ],
        ));
        let notifications = Arc::new(MockNotificationService::new());
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo.clone(),
            vec![("trip1", "member1")],
            notifications.clone(),
            sink.clone(),
        );

        let update = service
            .set_invite_status("act1", "member1", RsvpRequest::Declined)
            .await
            .unwrap();

        let promoted = update.promoted.expect("slot freed, someone must move up");
        assert_eq!(promoted.user_id, "member2");
        assert_eq!(promoted.status, InviteStatus::Accepted);
        assert_eq!(repo.invite_status("member2"), InviteStatus::Accepted);
        assert_eq!(repo.invite_status("member3"), InviteStatus::Waitlisted);

        assert_eq!(
            notifications.calls(),
            vec!["rsvp:member1:declined", "promoted:member2"]
        );

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            DomainEvent::InviteUpdated { status, .. } if *status == InviteStatus::Declined
        ));
        assert!(matches!(
            &events[1],
            DomainEvent::WaitlistPromoted { user_id, .. } if user_id == "member2"
        ));
    }

    #[tokio::test]
    async fn re_accept_when_already_accepted_is_a_silent_no_op() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(Some(2))],
            vec![invite("member1", InviteStatus::Accepted, 10)],
        ));
        let notifications = Arc::new(MockNotificationService::new());
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo,
            vec![("trip1", "member1")],
            notifications.clone(),
            sink.clone(),
        );

        let update = service
            .set_invite_status("act1", "member1", RsvpRequest::Accepted)
            .await
            .unwrap();

        assert!(!update.changed());
        assert!(notifications.calls().is_empty());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_rsvp() {
        let repo = Arc::new(MockScheduleRepository::new(
            vec![activity(Some(2))],
            vec![
                invite("organizer", InviteStatus::Accepted, 30),
                invite("member1", InviteStatus::Accepted, 20),
                invite("member2", InviteStatus::Waitlisted, 10),
            ],
        ));
        let sink = Arc::new(MockDomainEventSink::new());
        let service = service_with(
            repo.clone(),
            vec![("trip1", "member1")],
            Arc::new(MockNotificationService::failing()),
            sink.clone(),
        );

        let update = service
            .set_invite_status("act1", "member1", RsvpRequest::Declined)
            .await
            .unwrap();

        assert_eq!(update.invite.status, InviteStatus::Declined);
        assert_eq!(repo.invite_status("member2"), InviteStatus::Accepted);
        // Broadcast still happens even when the notification write fails.
        assert_eq!(sink.events().len(), 2);
    }
}

//! End-to-end storage tests: proposal conversion and RSVP resolution
//! against a real SQLite database.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use tripsync_core::errors::Error;
use tripsync_core::notifications::{NotificationService, NotificationServiceTrait};
use tripsync_core::proposals::{ConversionService, ConversionServiceTrait, NewProposal, ProposalCategory};
use tripsync_core::schedule::{InviteStatus, RsvpRequest, RsvpService, RsvpServiceTrait};
use tripsync_core::trips::{MemberRole, Trip};
use tripsync_storage_sqlite::db;
use tripsync_storage_sqlite::notifications::NotificationRepository;
use tripsync_storage_sqlite::proposals::ProposalRepository;
use tripsync_storage_sqlite::schedule::ScheduleRepository;
use tripsync_storage_sqlite::trips::TripRepository;

struct TestEnv {
    _dir: TempDir,
    trips: Arc<TripRepository>,
    conversion: ConversionService,
    rsvp: RsvpService,
    notifications: Arc<NotificationService>,
}

fn build_env() -> TestEnv {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("tripsync.db");
    let db_path = db::init(db_path.to_str().unwrap()).expect("init db path");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");
    let writer = db::spawn_writer((*pool).clone());

    let trips = Arc::new(TripRepository::new(pool.clone(), writer.clone()));
    let proposals = Arc::new(ProposalRepository::new(pool.clone(), writer.clone()));
    let schedule = Arc::new(ScheduleRepository::new(pool.clone(), writer.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(pool.clone(), writer));
    let notifications = Arc::new(NotificationService::new(notification_repo));

    let conversion =
        ConversionService::new(proposals, trips.clone(), notifications.clone());
    let rsvp = RsvpService::new(schedule, trips.clone(), notifications.clone());

    TestEnv {
        _dir: dir,
        trips,
        conversion,
        rsvp,
        notifications,
    }
}

async fn seed_trip(env: &TestEnv, trip_id: &str, members: &[&str]) {
    env.trips
        .create_trip(Trip {
            id: trip_id.to_string(),
            name: "Paris getaway".to_string(),
            destination_city: Some("Paris".to_string()),
            destination_country: Some("France".to_string()),
            start_date: None,
            end_date: None,
        })
        .await
        .expect("create trip");
    for (i, user_id) in members.iter().enumerate() {
        let role = if i == 0 {
            MemberRole::Organizer
        } else {
            MemberRole::Member
        };
        env.trips
            .add_member(trip_id.to_string(), user_id.to_string(), role)
            .await
            .expect("add member");
    }
}

async fn seed_restaurant_proposal(
    env: &TestEnv,
    trip_id: &str,
    created_by: &str,
    party_size: i32,
) -> String {
    let proposal = env
        .conversion
        .create_proposal(NewProposal {
            trip_id: trip_id.to_string(),
            created_by: created_by.to_string(),
            category: ProposalCategory::Restaurant,
            payload: json!({
                "restaurantName": "Le Jules Verne",
                "partySize": party_size,
                "reservationTime": "2025-09-10T19:30:00Z",
            }),
        })
        .await
        .expect("create proposal");
    proposal.id
}

#[tokio::test]
async fn conversion_creates_activity_and_invites_once() {
    let env = build_env();
    seed_trip(&env, "trip-1", &["alice", "bob", "carol"]).await;
    let proposal_id = seed_restaurant_proposal(&env, "trip-1", "alice", 6).await;

    let first = env
        .conversion
        .accept_proposal(&proposal_id, "bob", None)
        .await
        .expect("first accept");
    assert!(first.created);
    assert_eq!(first.activity.name, "Dinner at Le Jules Verne");
    assert_eq!(first.activity.max_capacity, Some(6));

    let invites = env.rsvp.get_invites(&first.activity.id).expect("invites");
    assert_eq!(invites.len(), 3);
    // Creator is seeded accepted, everyone else pending.
    let alice = invites.iter().find(|i| i.user_id == "alice").unwrap();
    assert_eq!(alice.status, InviteStatus::Accepted);
    assert!(invites
        .iter()
        .filter(|i| i.user_id != "alice")
        .all(|i| i.status == InviteStatus::Pending));

    // Accepting again returns the linked activity without new rows.
    let second = env
        .conversion
        .accept_proposal(&proposal_id, "carol", None)
        .await
        .expect("second accept");
    assert!(!second.created);
    assert_eq!(second.activity.id, first.activity.id);
    assert_eq!(
        env.rsvp.get_invites(&first.activity.id).unwrap().len(),
        3
    );
}

#[tokio::test]
async fn capacity_overflow_waitlists_in_fifo_order_and_promotes() {
    let env = build_env();
    seed_trip(&env, "trip-2", &["alice", "bob", "carol", "dave"]).await;
    let proposal_id = seed_restaurant_proposal(&env, "trip-2", "alice", 2).await;

    let outcome = env
        .conversion
        .accept_proposal(&proposal_id, "alice", None)
        .await
        .expect("convert");
    let activity_id = outcome.activity.id.clone();

    // Alice holds the first slot as creator; Bob takes the second.
    let bob = env
        .rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Accepted)
        .await
        .expect("bob accepts");
    assert_eq!(bob.invite.status, InviteStatus::Accepted);
    assert!(bob.promoted.is_none());

    // Carol and Dave both find the activity full and queue up in order.
    let carol = env
        .rsvp
        .set_invite_status(&activity_id, "carol", RsvpRequest::Accepted)
        .await
        .expect("carol accepts");
    assert_eq!(carol.invite.status, InviteStatus::Waitlisted);

    let dave = env
        .rsvp
        .set_invite_status(&activity_id, "dave", RsvpRequest::Accepted)
        .await
        .expect("dave accepts");
    assert_eq!(dave.invite.status, InviteStatus::Waitlisted);

    // A waitlisted member asking again does not jump the queue.
    let carol_again = env
        .rsvp
        .set_invite_status(&activity_id, "carol", RsvpRequest::Accepted)
        .await
        .expect("carol retries");
    assert_eq!(carol_again.invite.status, InviteStatus::Waitlisted);
    assert!(carol_again.promoted.is_none());

    // Bob declining frees a slot; Carol queued first, so Carol is promoted.
    let decline = env
        .rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Declined)
        .await
        .expect("bob declines");
    assert_eq!(decline.invite.status, InviteStatus::Declined);
    let promoted = decline.promoted.expect("promotion");
    assert_eq!(promoted.user_id, "carol");
    assert_eq!(promoted.status, InviteStatus::Accepted);

    let invites = env.rsvp.get_invites(&activity_id).expect("invites");
    let status_of = |user: &str| {
        invites
            .iter()
            .find(|i| i.user_id == user)
            .map(|i| i.status)
            .unwrap()
    };
    assert_eq!(status_of("alice"), InviteStatus::Accepted);
    assert_eq!(status_of("bob"), InviteStatus::Declined);
    assert_eq!(status_of("carol"), InviteStatus::Accepted);
    assert_eq!(status_of("dave"), InviteStatus::Waitlisted);
}

#[tokio::test]
async fn rejoining_member_queues_behind_current_waiters() {
    let env = build_env();
    seed_trip(&env, "trip-3", &["alice", "bob", "carol"]).await;
    let proposal_id = seed_restaurant_proposal(&env, "trip-3", "alice", 1).await;
    let activity_id = env
        .conversion
        .accept_proposal(&proposal_id, "alice", None)
        .await
        .expect("convert")
        .activity
        .id;

    // Bob queues first, then Carol.
    env.rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Accepted)
        .await
        .unwrap();
    env.rsvp
        .set_invite_status(&activity_id, "carol", RsvpRequest::Accepted)
        .await
        .unwrap();

    // Bob leaves the queue and comes back: now behind Carol.
    env.rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Declined)
        .await
        .unwrap();
    let bob = env
        .rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Accepted)
        .await
        .unwrap();
    assert_eq!(bob.invite.status, InviteStatus::Waitlisted);

    let freed = env
        .rsvp
        .set_invite_status(&activity_id, "alice", RsvpRequest::Declined)
        .await
        .unwrap();
    assert_eq!(freed.promoted.unwrap().user_id, "carol");
}

#[tokio::test]
async fn rsvp_rejects_outsiders_and_uninvited_members() {
    let env = build_env();
    seed_trip(&env, "trip-4", &["alice", "bob"]).await;
    let proposal_id = seed_restaurant_proposal(&env, "trip-4", "alice", 4).await;
    let activity_id = env
        .conversion
        .accept_proposal(&proposal_id, "alice", Some(vec!["alice".to_string()]))
        .await
        .expect("convert")
        .activity
        .id;

    // Not on the trip roster at all.
    let outsider = env
        .rsvp
        .set_invite_status(&activity_id, "mallory", RsvpRequest::Accepted)
        .await;
    assert!(matches!(outsider, Err(Error::Membership(_))));

    // A member the conversion did not invite.
    let uninvited = env
        .rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Accepted)
        .await;
    assert!(matches!(uninvited, Err(Error::Membership(_))));
}

#[tokio::test]
async fn notifications_are_recorded_for_invitees_and_promotions() {
    let env = build_env();
    seed_trip(&env, "trip-5", &["alice", "bob", "carol"]).await;
    let proposal_id = seed_restaurant_proposal(&env, "trip-5", "alice", 1).await;
    let activity_id = env
        .conversion
        .accept_proposal(&proposal_id, "alice", None)
        .await
        .expect("convert")
        .activity
        .id;

    // Conversion notifies every seeded member except the acting user.
    let bob_inbox = env
        .notifications
        .get_notifications_for_user("bob", 10)
        .expect("bob inbox");
    assert_eq!(bob_inbox.len(), 1);
    assert!(env
        .notifications
        .get_notifications_for_user("alice", 10)
        .unwrap()
        .is_empty());

    // Bob waitlists, Alice declines, Bob gets promoted and notified.
    env.rsvp
        .set_invite_status(&activity_id, "bob", RsvpRequest::Accepted)
        .await
        .unwrap();
    env.rsvp
        .set_invite_status(&activity_id, "alice", RsvpRequest::Declined)
        .await
        .unwrap();

    let bob_inbox = env
        .notifications
        .get_notifications_for_user("bob", 10)
        .expect("bob inbox");
    assert_eq!(bob_inbox.len(), 2);
}

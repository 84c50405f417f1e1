use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::model::{ActivityDB, InviteDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{activities, activity_invites};
use crate::utils::format_timestamp;
use tripsync_core::errors::{DatabaseError, Error, Result};
use tripsync_core::schedule::{
    resolve_rsvp, Invite, InviteStatus, RsvpRequest, RsvpUpdate, ScheduleRepositoryTrait,
    ScheduledActivity,
};

pub struct ScheduleRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ScheduleRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ScheduleRepository { pool, writer }
    }

    fn load_activity(conn: &mut SqliteConnection, activity_id: &str) -> Result<ActivityDB> {
        activities::table
            .find(activity_id)
            .first::<ActivityDB>(conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("Activity {}", activity_id)))
            })
    }

    fn count_accepted(conn: &mut SqliteConnection, activity_id: &str) -> Result<i64> {
        activity_invites::table
            .filter(activity_invites::activity_id.eq(activity_id))
            .filter(activity_invites::status.eq(InviteStatus::Accepted.as_str()))
            .count()
            .get_result(conn)
            .map_err(|e| StorageError::from(e).into())
    }

    /// Promotes the earliest waitlisted invite, if any. Runs inside the
    /// same transaction as the freeing transition, and writes `accepted`
    /// directly: the capacity redirect in `resolve_rsvp` must not re-run
    /// here, the slot was freed a statement ago.
    fn promote_earliest_waitlisted(
        conn: &mut SqliteConnection,
        activity_id: &str,
    ) -> Result<Option<InviteDB>> {
        let earliest = activity_invites::table
            .filter(activity_invites::activity_id.eq(activity_id))
            .filter(activity_invites::status.eq(InviteStatus::Waitlisted.as_str()))
            .order(activity_invites::created_at.asc())
            .first::<InviteDB>(conn)
            .optional()
            .map_err(StorageError::from)?;

        let Some(mut invite) = earliest else {
            return Ok(None);
        };

        let stamp = format_timestamp(&Utc::now());
        diesel::update(activity_invites::table.find(&invite.id))
            .set((
                activity_invites::status.eq(InviteStatus::Accepted.as_str()),
                activity_invites::updated_at.eq(&stamp),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        invite.status = InviteStatus::Accepted.as_str().to_string();
        invite.updated_at = stamp;
        Ok(Some(invite))
    }
}

#[async_trait]
impl ScheduleRepositoryTrait for ScheduleRepository {
    fn get_activity(&self, activity_id: &str) -> Result<ScheduledActivity> {
        let mut conn = get_connection(&self.pool)?;
        let db = Self::load_activity(&mut conn, activity_id)?;
        ScheduledActivity::try_from(db).map_err(Error::from)
    }

    fn get_activities_by_trip(&self, trip_id: &str) -> Result<Vec<ScheduledActivity>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = activities::table
            .filter(activities::trip_id.eq(trip_id))
            .order(activities::start_time.asc())
            .load::<ActivityDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|db| ScheduledActivity::try_from(db).map_err(Error::from))
            .collect()
    }

    fn get_invites(&self, activity_id: &str) -> Result<Vec<Invite>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = activity_invites::table
            .filter(activity_invites::activity_id.eq(activity_id))
            .order(activity_invites::created_at.asc())
            .load::<InviteDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|db| Invite::try_from(db).map_err(Error::from))
            .collect()
    }

    /// The whole RSVP algorithm as one writer job: load, count, resolve,
    /// update, and promote, all inside one immediate transaction. Requests
    /// racing for the last slot serialize on the writer; the loser sees a
    /// full count and is downgraded rather than erroring.
    async fn apply_rsvp(
        &self,
        activity_id: String,
        user_id: String,
        requested: RsvpRequest,
    ) -> Result<RsvpUpdate> {
        self.writer
            .exec(move |conn| -> Result<RsvpUpdate> {
                let activity = Self::load_activity(conn, &activity_id)?;

                let invite_row = activity_invites::table
                    .filter(activity_invites::activity_id.eq(&activity_id))
                    .filter(activity_invites::user_id.eq(&user_id))
                    .first::<InviteDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::Membership(format!(
                            "User {} was not invited to activity {}",
                            user_id, activity_id
                        ))
                    })?;

                let previous_status = invite_row
                    .status
                    .parse::<InviteStatus>()
                    .map_err(StorageError::DecodeFailed)?;
                let accepted_count = Self::count_accepted(conn, &activity_id)?;
                let decision = resolve_rsvp(
                    previous_status,
                    requested,
                    accepted_count,
                    activity.max_capacity,
                );

                let now = Utc::now();
                let stamp = format_timestamp(&now);
                let mut updated = invite_row.clone();
                updated.status = decision.next.as_str().to_string();
                updated.updated_at = stamp.clone();
                // Joining the waitlist refreshes created_at: a member who
                // declined and came back queues behind current waiters.
                if decision.joins_waitlist {
                    updated.created_at = stamp;
                }
                diesel::update(activity_invites::table.find(&invite_row.id))
                    .set(&updated)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let promoted = if decision.frees_slot {
                    Self::promote_earliest_waitlisted(conn, &activity_id)?
                        .map(|db| Invite::try_from(db).map_err(Error::from))
                        .transpose()?
                } else {
                    None
                };

                Ok(RsvpUpdate {
                    invite: Invite::try_from(updated).map_err(Error::from)?,
                    previous_status,
                    promoted,
                })
            })
            .await
    }
}

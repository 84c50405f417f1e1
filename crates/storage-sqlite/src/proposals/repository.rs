use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{ProposalDB, ProposalScheduleLinkDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schedule::{ActivityDB, InviteDB};
use crate::schema::{activities, activity_invites, proposal_schedule_links, proposals};
use crate::utils::format_timestamp;
use tripsync_core::errors::{DatabaseError, Error, Result};
use tripsync_core::proposals::{
    ConversionOutcome, NewProposal, Proposal, ProposalRepositoryTrait, ProposalStatus,
};
use tripsync_core::schedule::{InviteSeed, NewScheduledActivity, ScheduledActivity};

pub struct ProposalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProposalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProposalRepository { pool, writer }
    }
}

#[async_trait]
impl ProposalRepositoryTrait for ProposalRepository {
    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        let mut conn = get_connection(&self.pool)?;
        let db = proposals::table
            .find(proposal_id)
            .first::<ProposalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("Proposal {}", proposal_id)))
            })?;
        Proposal::try_from(db).map_err(Error::from)
    }

    fn get_proposals_by_trip(&self, trip_id: &str) -> Result<Vec<Proposal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = proposals::table
            .filter(proposals::trip_id.eq(trip_id))
            .order(proposals::created_at.asc())
            .load::<ProposalDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|db| Proposal::try_from(db).map_err(Error::from))
            .collect()
    }

    async fn create_proposal(&self, new_proposal: NewProposal) -> Result<Proposal> {
        self.writer
            .exec(move |conn| -> Result<Proposal> {
                let db = ProposalDB::from_new(
                    &new_proposal,
                    Uuid::new_v4().to_string(),
                    &Utc::now(),
                );
                diesel::insert_into(proposals::table)
                    .values(&db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Proposal::try_from(db).map_err(Error::from)
            })
            .await
    }

    /// The conversion write: idempotency check, activity insert, link
    /// insert, invite seeding, and proposal status update as one
    /// transaction. The write actor wraps this job in
    /// `immediate_transaction`, so a failure at any step leaves no partial
    /// rows behind.
    async fn convert_to_scheduled(
        &self,
        proposal_id: String,
        activity: NewScheduledActivity,
        invites: Vec<InviteSeed>,
    ) -> Result<ConversionOutcome> {
        self.writer
            .exec(move |conn| -> Result<ConversionOutcome> {
                // Lock in the proposal's existence before writing anything.
                let proposal_row = proposals::table
                    .find(&proposal_id)
                    .first::<ProposalDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::Database(DatabaseError::NotFound(format!(
                            "Proposal {}",
                            proposal_id
                        )))
                    })?;

                // Idempotency short-circuit: an existing link means this
                // proposal was already converted, possibly by a concurrent
                // request that committed first.
                let existing_link = proposal_schedule_links::table
                    .find(&proposal_id)
                    .first::<ProposalScheduleLinkDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if let Some(link) = existing_link {
                    let db = activities::table
                        .find(&link.scheduled_activity_id)
                        .first::<ActivityDB>(conn)
                        .map_err(StorageError::from)?;
                    return Ok(ConversionOutcome {
                        activity: ScheduledActivity::try_from(db).map_err(Error::from)?,
                        created: false,
                    });
                }

                let now = Utc::now();
                let activity_db =
                    ActivityDB::from_new(&activity, Uuid::new_v4().to_string(), &now);
                diesel::insert_into(activities::table)
                    .values(&activity_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(proposal_schedule_links::table)
                    .values(&ProposalScheduleLinkDB {
                        proposal_id: proposal_id.clone(),
                        scheduled_activity_id: activity_db.id.clone(),
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;

                // Stagger seed timestamps by a microsecond each so the
                // waitlist FIFO order among same-batch invites is stable.
                for (index, seed) in invites.iter().enumerate() {
                    let seeded_at = now + Duration::microseconds(index as i64);
                    let row = InviteDB {
                        id: Uuid::new_v4().to_string(),
                        activity_id: activity_db.id.clone(),
                        user_id: seed.user_id.clone(),
                        status: seed.status.as_str().to_string(),
                        created_at: format_timestamp(&seeded_at),
                        updated_at: format_timestamp(&seeded_at),
                    };
                    diesel::insert_into(activity_invites::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                diesel::update(proposals::table.find(&proposal_row.id))
                    .set((
                        proposals::status.eq(ProposalStatus::Accepted.as_str()),
                        proposals::updated_at.eq(format_timestamp(&now)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(ConversionOutcome {
                    activity: ScheduledActivity::try_from(activity_db).map_err(Error::from)?,
                    created: true,
                })
            })
            .await
    }
}

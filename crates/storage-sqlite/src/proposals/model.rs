//! Database models for proposals and the conversion link table.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};
use tripsync_core::proposals::{NewProposal, Proposal, ProposalCategory, ProposalStatus};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::proposals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProposalDB {
    pub id: String,
    pub trip_id: String,
    pub created_by: String,
    pub category: String,
    pub payload: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The idempotency guard: one row per converted proposal, primary key on
/// `proposal_id`.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::proposal_schedule_links)]
#[diesel(primary_key(proposal_id))]
#[serde(rename_all = "camelCase")]
pub struct ProposalScheduleLinkDB {
    pub proposal_id: String,
    pub scheduled_activity_id: String,
}

impl TryFrom<ProposalDB> for Proposal {
    type Error = StorageError;

    fn try_from(db: ProposalDB) -> Result<Self, Self::Error> {
        Ok(Proposal {
            category: ProposalCategory::from_str(&db.category)
                .map_err(StorageError::DecodeFailed)?,
            status: ProposalStatus::from_str(&db.status).map_err(StorageError::DecodeFailed)?,
            payload: serde_json::from_str(&db.payload)
                .map_err(|e| StorageError::DecodeFailed(e.to_string()))?,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            id: db.id,
            trip_id: db.trip_id,
            created_by: db.created_by,
        })
    }
}

impl ProposalDB {
    pub fn from_new(new: &NewProposal, id: String, now: &chrono::DateTime<chrono::Utc>) -> Self {
        let stamp = format_timestamp(now);
        ProposalDB {
            id,
            trip_id: new.trip_id.clone(),
            created_by: new.created_by.clone(),
            category: new.category.as_str().to_string(),
            payload: new.payload.to_string(),
            status: ProposalStatus::Proposed.as_str().to_string(),
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

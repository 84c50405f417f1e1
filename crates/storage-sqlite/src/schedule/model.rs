//! Database models for scheduled activities and invites.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};
use tripsync_core::schedule::{
    ActivityKind, ActivityStatus, Invite, InviteStatus, NewScheduledActivity, ScheduledActivity,
};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityDB {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub cost: Option<String>,
    pub currency: Option<String>,
    pub max_capacity: Option<i32>,
    pub status: String,
    pub kind: String,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::activity_invites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InviteDB {
    pub id: String,
    pub activity_id: String,
    pub user_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ActivityDB> for ScheduledActivity {
    type Error = StorageError;

    fn try_from(db: ActivityDB) -> Result<Self, Self::Error> {
        Ok(ScheduledActivity {
            status: ActivityStatus::from_str(&db.status).map_err(StorageError::DecodeFailed)?,
            kind: ActivityKind::from_str(&db.kind).map_err(StorageError::DecodeFailed)?,
            start_time: db.start_time.as_deref().map(parse_timestamp).transpose()?,
            end_time: db.end_time.as_deref().map(parse_timestamp).transpose()?,
            cost: db
                .cost
                .as_deref()
                .map(|raw| {
                    Decimal::from_str(raw).map_err(|e| {
                        StorageError::DecodeFailed(format!("Invalid cost '{}': {}", raw, e))
                    })
                })
                .transpose()?,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            id: db.id,
            trip_id: db.trip_id,
            name: db.name,
            description: db.description,
            location_city: db.location_city,
            location_country: db.location_country,
            currency: db.currency,
            max_capacity: db.max_capacity,
            created_by: db.created_by,
        })
    }
}

impl ActivityDB {
    pub fn from_new(
        new: &NewScheduledActivity,
        id: String,
        now: &chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let stamp = format_timestamp(now);
        ActivityDB {
            id,
            trip_id: new.trip_id.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            start_time: new.start_time.as_ref().map(format_timestamp),
            end_time: new.end_time.as_ref().map(format_timestamp),
            location_city: new.location_city.clone(),
            location_country: new.location_country.clone(),
            cost: new.cost.map(|c| c.to_string()),
            currency: new.currency.clone(),
            max_capacity: new.max_capacity,
            status: ActivityStatus::Scheduled.as_str().to_string(),
            kind: ActivityKind::Scheduled.as_str().to_string(),
            created_by: new.created_by.clone(),
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

impl TryFrom<InviteDB> for Invite {
    type Error = StorageError;

    fn try_from(db: InviteDB) -> Result<Self, Self::Error> {
        Ok(Invite {
            status: InviteStatus::from_str(&db.status).map_err(StorageError::DecodeFailed)?,
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            id: db.id,
            activity_id: db.activity_id,
            user_id: db.user_id,
        })
    }
}

//! Database models for trips and trip membership.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_date, format_timestamp, parse_date};
use tripsync_core::trips::Trip;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::trips)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TripDB {
    pub id: String,
    pub name: String,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::trip_members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TripMemberDB {
    pub id: String,
    pub trip_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
}

impl TryFrom<TripDB> for Trip {
    type Error = StorageError;

    fn try_from(db: TripDB) -> Result<Self, Self::Error> {
        Ok(Trip {
            id: db.id,
            name: db.name,
            destination_city: db.destination_city,
            destination_country: db.destination_country,
            start_date: db.start_date.as_deref().map(parse_date).transpose()?,
            end_date: db.end_date.as_deref().map(parse_date).transpose()?,
        })
    }
}

impl TripDB {
    pub fn from_domain(trip: &Trip, now: &chrono::DateTime<chrono::Utc>) -> Self {
        let stamp = format_timestamp(now);
        TripDB {
            id: trip.id.clone(),
            name: trip.name.clone(),
            destination_city: trip.destination_city.clone(),
            destination_country: trip.destination_country.clone(),
            start_date: trip.start_date.as_ref().map(format_date),
            end_date: trip.end_date.as_ref().map(format_date),
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{TripDB, TripMemberDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{trip_members, trips};
use crate::utils::format_timestamp;
use tripsync_core::errors::{DatabaseError, Error, Result};
use tripsync_core::trips::{MemberRole, Trip, TripRepositoryTrait};

/// Trip and membership store.
///
/// Conversion and RSVP only read from it; the seeding methods exist for
/// the thin trip-management endpoints and for test setup.
pub struct TripRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TripRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TripRepository { pool, writer }
    }

    pub async fn create_trip(&self, trip: Trip) -> Result<Trip> {
        self.writer
            .exec(move |conn| -> Result<Trip> {
                let db = TripDB::from_domain(&trip, &Utc::now());
                diesel::insert_into(trips::table)
                    .values(&db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(trip)
            })
            .await
    }

    pub async fn add_member(
        &self,
        trip_id: String,
        user_id: String,
        role: MemberRole,
    ) -> Result<()> {
        self.writer
            .exec(move |conn| -> Result<()> {
                let row = TripMemberDB {
                    id: Uuid::new_v4().to_string(),
                    trip_id,
                    user_id,
                    role: role.as_str().to_string(),
                    created_at: format_timestamp(&Utc::now()),
                };
                diesel::insert_into(trip_members::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    pub async fn remove_member(&self, trip_id: String, user_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn| -> Result<usize> {
                Ok(diesel::delete(
                    trip_members::table
                        .filter(trip_members::trip_id.eq(trip_id))
                        .filter(trip_members::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}

impl TripRepositoryTrait for TripRepository {
    fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        let mut conn = get_connection(&self.pool)?;
        let db = trips::table
            .find(trip_id)
            .first::<TripDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("Trip {}", trip_id)))
            })?;
        Ok(Trip::try_from(db).map_err(Error::from)?)
    }

    fn get_member_ids(&self, trip_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = trip_members::table
            .filter(trip_members::trip_id.eq(trip_id))
            .order(trip_members::created_at.asc())
            .select(trip_members::user_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids)
    }

    fn is_member(&self, trip_id: &str, user_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = trip_members::table
            .filter(trip_members::trip_id.eq(trip_id))
            .filter(trip_members::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }
}

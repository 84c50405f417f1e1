use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::NotificationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::notifications;
use tripsync_core::errors::{Error, Result};
use tripsync_core::notifications::{
    NewNotification, Notification, NotificationRepositoryTrait,
};

/// Append-only notification store.
pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        NotificationRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn create_notifications(&self, new_notifications: Vec<NewNotification>) -> Result<usize> {
        self.writer
            .exec(move |conn| -> Result<usize> {
                let now = Utc::now();
                let rows: Vec<NotificationDB> = new_notifications
                    .iter()
                    .map(|n| NotificationDB::from_new(n, Uuid::new_v4().to_string(), &now))
                    .collect();
                Ok(diesel::insert_into(notifications::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_notifications_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order(notifications::created_at.desc())
            .limit(limit)
            .load::<NotificationDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|db| Notification::try_from(db).map_err(Error::from))
            .collect()
    }
}

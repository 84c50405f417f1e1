//! Database model for notifications.

use std::str::FromStr;

use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_timestamp};
use tripsync_core::notifications::{NewNotification, Notification, NotificationKind};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub payload: String,
    pub created_at: String,
}

impl TryFrom<NotificationDB> for Notification {
    type Error = StorageError;

    fn try_from(db: NotificationDB) -> Result<Self, Self::Error> {
        Ok(Notification {
            kind: NotificationKind::from_str(&db.kind).map_err(StorageError::DecodeFailed)?,
            payload: serde_json::from_str(&db.payload)
                .map_err(|e| StorageError::DecodeFailed(e.to_string()))?,
            created_at: parse_timestamp(&db.created_at)?,
            id: db.id,
            user_id: db.user_id,
        })
    }
}

impl NotificationDB {
    pub fn from_new(
        new: &NewNotification,
        id: String,
        now: &chrono::DateTime<chrono::Utc>,
    ) -> Self {
        NotificationDB {
            id,
            user_id: new.user_id.clone(),
            kind: new.kind.as_str().to_string(),
            payload: new.payload.to_string(),
            created_at: format_timestamp(now),
        }
    }
}

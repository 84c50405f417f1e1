//! Notifications domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a notification row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A proposal was converted and the recipient was invited.
    InviteReceived,
    /// A member accepted an invite (sent to the activity organizer).
    InviteAccepted,
    /// A member declined an invite (sent to the activity organizer).
    InviteDeclined,
    /// The recipient was promoted off the waitlist.
    WaitlistPromoted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::InviteReceived => "invite_received",
            NotificationKind::InviteAccepted => "invite_accepted",
            NotificationKind::InviteDeclined => "invite_declined",
            NotificationKind::WaitlistPromoted => "waitlist_promoted",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invite_received" => Ok(NotificationKind::InviteReceived),
            "invite_accepted" => Ok(NotificationKind::InviteAccepted),
            "invite_declined" => Ok(NotificationKind::InviteDeclined),
            "waitlist_promoted" => Ok(NotificationKind::WaitlistPromoted),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

/// Domain model for a notification. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input model for appending a notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub payload: serde_json::Value,
}

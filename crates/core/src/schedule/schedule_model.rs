//! Schedule domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a scheduled activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Scheduled,
    Completed,
    Canceled,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "scheduled",
            ActivityStatus::Completed => "completed",
            ActivityStatus::Canceled => "canceled",
        }
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ActivityStatus::Scheduled),
            "completed" => Ok(ActivityStatus::Completed),
            "canceled" => Ok(ActivityStatus::Canceled),
            other => Err(format!("Unknown activity status: {}", other)),
        }
    }
}

/// Legacy activity kind discriminator.
///
/// Clients of the previous backend received a `SCHEDULED | PROPOSE` type
/// field on activity rows. Proposals now live only in the `proposals`
/// table, so the single canonical write path only ever produces
/// `Scheduled`; `Propose` survives purely so the wire shape stays stable
/// for existing consumers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Scheduled,
    Propose,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Scheduled => "SCHEDULED",
            ActivityKind::Propose => "PROPOSE",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(ActivityKind::Scheduled),
            "PROPOSE" => Ok(ActivityKind::Propose),
            other => Err(format!("Unknown activity kind: {}", other)),
        }
    }
}

/// Domain model for a calendar-committed activity.
///
/// Created exactly once per accepted proposal by the conversion
/// coordinator. `max_capacity = None` means unlimited attendance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub cost: Option<Decimal>,
    pub currency: Option<String>,
    pub max_capacity: Option<i32>,
    pub status: ActivityStatus,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for inserting a scheduled activity during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledActivity {
    pub trip_id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub cost: Option<Decimal>,
    pub currency: Option<String>,
    pub max_capacity: Option<i32>,
    pub created_by: String,
}

/// Status of a per-member attendance record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Waitlisted,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
            InviteStatus::Waitlisted => "waitlisted",
        }
    }
}

impl FromStr for InviteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InviteStatus::Pending),
            "accepted" => Ok(InviteStatus::Accepted),
            "declined" => Ok(InviteStatus::Declined),
            "waitlisted" => Ok(InviteStatus::Waitlisted),
            other => Err(format!("Unknown invite status: {}", other)),
        }
    }
}

/// Domain model for an invite.
///
/// Exactly one row exists per (activity, user). `created_at` is the FIFO
/// ordering key for waitlist promotion; it is refreshed whenever the invite
/// enters the waitlist so returning members queue behind current waiters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: String,
    pub activity_id: String,
    pub user_id: String,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Seed row for invites created alongside a converted activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteSeed {
    pub user_id: String,
    pub status: InviteStatus,
}

/// The status a member may request through the RSVP entrypoint.
///
/// `waitlisted` is never requested directly - it is a capacity outcome -
/// and `pending` only exists as the seeded initial state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsvpRequest {
    Accepted,
    Declined,
}

impl RsvpRequest {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpRequest::Accepted => "accepted",
            RsvpRequest::Declined => "declined",
        }
    }
}

impl FromStr for RsvpRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(RsvpRequest::Accepted),
            "declined" => Ok(RsvpRequest::Declined),
            other => Err(format!(
                "Requested invite status must be 'accepted' or 'declined', got: {}",
                other
            )),
        }
    }
}

/// Outcome of one committed RSVP transaction.
///
/// `promoted` carries the invite the waitlist promotion engine accepted in
/// the same transaction, when the RSVP freed a slot on a capacity-limited
/// activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpUpdate {
    pub invite: Invite,
    pub previous_status: InviteStatus,
    pub promoted: Option<Invite>,
}

impl RsvpUpdate {
    /// True when the transaction actually changed the invite row.
    pub fn changed(&self) -> bool {
        self.previous_status != self.invite.status
    }
}

//! Proposals domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::schedule::ScheduledActivity;

/// Category tag of a proposal. Drives how the category-specific payload is
/// interpreted during conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProposalCategory {
    Restaurant,
    Flight,
    Hotel,
    Activity,
}

impl ProposalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalCategory::Restaurant => "restaurant",
            ProposalCategory::Flight => "flight",
            ProposalCategory::Hotel => "hotel",
            ProposalCategory::Activity => "activity",
        }
    }
}

impl FromStr for ProposalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant" => Ok(ProposalCategory::Restaurant),
            "flight" => Ok(ProposalCategory::Flight),
            "hotel" => Ok(ProposalCategory::Hotel),
            "activity" => Ok(ProposalCategory::Activity),
            other => Err(format!("Unknown proposal category: {}", other)),
        }
    }
}

/// Lifecycle status of a proposal. `Proposed` is the only non-terminal
/// state; the conversion coordinator is the only writer of `Accepted`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Proposed,
    Accepted,
    Declined,
    Expired,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Proposed => "proposed",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Declined => "declined",
            ProposalStatus::Expired => "expired",
        }
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(ProposalStatus::Proposed),
            "accepted" => Ok(ProposalStatus::Accepted),
            "declined" => Ok(ProposalStatus::Declined),
            "expired" => Ok(ProposalStatus::Expired),
            other => Err(format!("Unknown proposal status: {}", other)),
        }
    }
}

/// Domain model for a proposal row.
///
/// `payload` is the arbitrary category-specific JSON the member submitted;
/// conversion derives activity fields from it with explicit fallbacks
/// rather than validating it up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub trip_id: String,
    pub created_by: String,
    pub category: ProposalCategory,
    pub payload: serde_json::Value,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub trip_id: String,
    pub created_by: String,
    pub category: ProposalCategory,
    pub payload: serde_json::Value,
}

/// Result of one accept-proposal call.
///
/// `created = false` marks the idempotency short-circuit: the proposal was
/// already converted and `activity` is the previously linked row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    pub activity: ScheduledActivity,
    pub created: bool,
}

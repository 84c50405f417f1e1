use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tripsync_core::schedule::{Invite, RsvpRequest, ScheduledActivity};

async fn get_activity(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduledActivity>> {
    let activity = state.rsvp_service.get_activity(&id)?;
    Ok(Json(activity))
}

async fn get_activity_invites(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Invite>>> {
    let invites = state.rsvp_service.get_invites(&id)?;
    Ok(Json(invites))
}

async fn get_trip_activities(
    Path(trip_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ScheduledActivity>>> {
    let activities = state.rsvp_service.get_activities_by_trip(&trip_id)?;
    Ok(Json(activities))
}

#[derive(Deserialize)]
struct RsvpBody {
    status: RsvpRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RsvpResponse {
    invite: Invite,
    promoted_user_id: Option<String>,
}

/// Sets a member's RSVP. A full activity downgrades an accept to
/// waitlisted rather than failing; the response carries the invite the
/// member actually ended up with, plus the user promoted off the waitlist
/// when this response freed a slot.
async fn set_invite_status(
    Path((activity_id, user_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RsvpBody>,
) -> ApiResult<Json<RsvpResponse>> {
    let update = state
        .rsvp_service
        .set_invite_status(&activity_id, &user_id, body.status)
        .await?;
    Ok(Json(RsvpResponse {
        promoted_user_id: update.promoted.map(|p| p.user_id),
        invite: update.invite,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities/{id}", get(get_activity))
        .route("/activities/{id}/invites", get(get_activity_invites))
        .route(
            "/activities/{id}/invites/{user_id}",
            put(set_invite_status),
        )
        .route("/trips/{trip_id}/activities", get(get_trip_activities))
}

use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;
use tripsync_core::trips::{MemberRole, Trip};
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTripRequest {
    name: String,
    destination_city: Option<String>,
    destination_country: Option<String>,
    start_date: Option<chrono::NaiveDate>,
    end_date: Option<chrono::NaiveDate>,
    /// The creating user, seeded as the trip's organizer.
    created_by: String,
}

async fn create_trip(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTripRequest>,
) -> ApiResult<(StatusCode, Json<Trip>)> {
    let trip = Trip {
        id: Uuid::new_v4().to_string(),
        name: body.name,
        destination_city: body.destination_city,
        destination_country: body.destination_country,
        start_date: body.start_date,
        end_date: body.end_date,
    };
    let trip = state.trip_repository.create_trip(trip).await?;
    state
        .trip_repository
        .add_member(trip.id.clone(), body.created_by, MemberRole::Organizer)
        .await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddMemberRequest {
    user_id: String,
    #[serde(default = "default_role")]
    role: MemberRole,
}

fn default_role() -> MemberRole {
    MemberRole::Member
}

async fn add_member(
    Path(trip_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddMemberRequest>,
) -> ApiResult<StatusCode> {
    state
        .trip_repository
        .add_member(trip_id, body.user_id, body.role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_member(
    Path((trip_id, user_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.trip_repository.remove_member(trip_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/{trip_id}/members", post(add_member))
        .route("/trips/{trip_id}/members/{user_id}", delete(remove_member))
}

use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tripsync_core::proposals::{ConversionOutcome, NewProposal, Proposal};

async fn create_proposal(
    State(state): State<Arc<AppState>>,
    Json(new_proposal): Json<NewProposal>,
) -> ApiResult<(StatusCode, Json<Proposal>)> {
    let proposal = state.conversion_service.create_proposal(new_proposal).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

async fn get_proposal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Proposal>> {
    let proposal = state.conversion_service.get_proposal(&id)?;
    Ok(Json(proposal))
}

async fn get_trip_proposals(
    Path(trip_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Proposal>>> {
    let proposals = state.conversion_service.get_proposals_by_trip(&trip_id)?;
    Ok(Json(proposals))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptRequest {
    user_id: String,
    attendees: Option<Vec<String>>,
}

/// Converts the proposal into a scheduled activity. Replays of the same
/// accept return the already-linked activity with 200 instead of 201.
async fn accept_proposal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcceptRequest>,
) -> ApiResult<(StatusCode, Json<ConversionOutcome>)> {
    let outcome = state
        .conversion_service
        .accept_proposal(&id, &body.user_id, body.attendees)
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/proposals", post(create_proposal))
        .route("/proposals/{id}", get(get_proposal))
        .route("/proposals/{id}/accept", post(accept_proposal))
        .route("/trips/{trip_id}/proposals", get(get_trip_proposals))
}

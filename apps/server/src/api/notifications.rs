use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tripsync_core::notifications::Notification;

const DEFAULT_LIMIT: i64 = 50;

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

async fn get_user_notifications(
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Notification>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 200);
    let notifications = state
        .notification_service
        .get_notifications_for_user(&user_id, limit)?;
    Ok(Json(notifications))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{user_id}/notifications", get(get_user_notifications))
}

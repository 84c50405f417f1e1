use std::sync::Arc;

use crate::main_lib::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

/// Liveness plus travel-provider credential state.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let token_valid = state.search_provider.has_valid_token().await;
    Json(json!({
        "status": "healthy",
        "amadeusEnv": state.amadeus_env,
        "amadeusToken": if token_valid { "valid" } else { "invalid" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

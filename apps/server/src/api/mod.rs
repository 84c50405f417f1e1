//! HTTP API composition.

pub mod health;
pub mod notifications;
pub mod proposals;
pub mod schedule;
pub mod search;
pub mod trips;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;
use crate::realtime::handler_ws;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = build_cors(&config.cors_origin);

    let api = Router::new()
        .merge(proposals::router())
        .merge(schedule::router())
        .merge(notifications::router())
        .merge(search::router())
        .merge(trips::router())
        .merge(health::router());

    Router::new()
        .nest("/api", api)
        .route("/ws", get(handler_ws))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', allowing any origin", origin);
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

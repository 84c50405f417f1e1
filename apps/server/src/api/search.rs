use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tripsync_travel_search::{
    ActivitySearchParams, FlightSearchParams, HotelSearchParams, SearchResponse,
};

fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing required parameter: {}", field)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightQuery {
    origin: Option<String>,
    destination: Option<String>,
    departure_date: Option<String>,
    return_date: Option<String>,
    adults: Option<String>,
    travel_class: Option<String>,
    airline: Option<String>,
}

async fn search_flights(
    Query(query): Query<FlightQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SearchResponse>> {
    let params = FlightSearchParams::new(
        require(&query.origin, "origin")?,
        require(&query.destination, "destination")?,
        require(&query.departure_date, "departureDate")?,
        query.return_date.as_deref(),
        query.adults.as_deref(),
        query.travel_class.as_deref(),
        query.airline.as_deref(),
    )?;
    let response = state.search_provider.search_flights(&params).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelQuery {
    city_code: Option<String>,
    check_in_date: Option<String>,
    check_out_date: Option<String>,
    adults: Option<String>,
    room_quantity: Option<String>,
}

async fn search_hotels(
    Query(query): Query<HotelQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SearchResponse>> {
    let params = HotelSearchParams::new(
        require(&query.city_code, "cityCode")?,
        require(&query.check_in_date, "checkInDate")?,
        require(&query.check_out_date, "checkOutDate")?,
        query.adults.as_deref(),
        query.room_quantity.as_deref(),
    )?;
    let response = state.search_provider.search_hotels(&params).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityQuery {
    latitude: Option<String>,
    longitude: Option<String>,
    radius: Option<String>,
}

async fn search_activities(
    Query(query): Query<ActivityQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SearchResponse>> {
    let params = ActivitySearchParams::new(
        require(&query.latitude, "latitude")?,
        require(&query.longitude, "longitude")?,
        query.radius.as_deref(),
    )?;
    let response = state.search_provider.search_activities(&params).await?;
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search/flights", get(search_flights))
        .route("/search/hotels", get(search_hotels))
        .route("/search/activities", get(search_activities))
}

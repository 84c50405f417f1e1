//! Travel offer search for TripSync.
//!
//! This crate wraps the Amadeus self-service APIs behind a provider trait
//! so the server (and tests) never talk to the HTTP client directly.
//!
//! # Overview
//!
//! - Flight offers (round trip or one way, optional airline filter)
//! - Hotel offers by city code and stay dates
//! - Points-of-interest activities by coordinates
//!
//! Search parameters are validated at construction, so a provider only
//! ever sees well-formed requests; responses are passed through as the
//! provider's raw `data`/`meta` JSON rather than remodeled.

pub mod amadeus;
pub mod errors;
pub mod models;
pub mod provider;

pub use amadeus::{AmadeusClient, AmadeusConfig};
pub use errors::TravelSearchError;
pub use models::{
    ActivitySearchParams, FlightSearchParams, HotelSearchParams, SearchResponse, TravelClass,
};
pub use provider::OfferSearchProvider;

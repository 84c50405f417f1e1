//! Provider abstraction for offer search backends.

use async_trait::async_trait;

use crate::errors::TravelSearchError;
use crate::models::{
    ActivitySearchParams, FlightSearchParams, HotelSearchParams, SearchResponse,
};

/// A backend capable of searching travel offers.
///
/// The server depends on this trait, not on a concrete client, so tests
/// can substitute a canned provider.
#[async_trait]
pub trait OfferSearchProvider: Send + Sync {
    /// Stable provider identifier, e.g. "AMADEUS".
    fn id(&self) -> &'static str;

    async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<SearchResponse, TravelSearchError>;

    async fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> Result<SearchResponse, TravelSearchError>;

    async fn search_activities(
        &self,
        params: &ActivitySearchParams,
    ) -> Result<SearchResponse, TravelSearchError>;

    /// True when the provider currently holds (or can obtain) valid
    /// credentials. Used by the health endpoint.
    async fn has_valid_token(&self) -> bool;
}

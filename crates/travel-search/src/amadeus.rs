//! Amadeus self-service API client.
//!
//! Authentication uses the client-credentials grant; the access token is
//! cached until shortly before its announced expiry so concurrent searches
//! share one token instead of racing the OAuth endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::TravelSearchError;
use crate::models::{
    ActivitySearchParams, FlightSearchParams, HotelSearchParams, SearchResponse,
};
use crate::provider::OfferSearchProvider;

const PROVIDER_ID: &str = "AMADEUS";
const PROD_BASE_URL: &str = "https://api.amadeus.com";
const TEST_BASE_URL: &str = "https://test.api.amadeus.com";

const TOKEN_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Tokens announce their lifetime; renew this long before it ends.
const TOKEN_EXPIRY_BUFFER_SECS: i64 = 300;
const TOKEN_MIN_LIFETIME_SECS: i64 = 60;
const DEFAULT_EXPIRES_IN_SECS: i64 = 1800;

/// Connection settings for the Amadeus client.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    /// "prod" or "test"; picks the base URL unless one is given explicitly.
    pub environment: String,
    pub base_url: Option<String>,
}

impl AmadeusConfig {
    pub fn resolved_base_url(&self) -> String {
        if let Some(url) = &self.base_url {
            return url.clone();
        }
        if self.environment.eq_ignore_ascii_case("prod") {
            PROD_BASE_URL.to_string()
        } else {
            TEST_BASE_URL.to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Amadeus-backed [`OfferSearchProvider`].
pub struct AmadeusClient {
    client: Client,
    config: AmadeusConfig,
    base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        let base_url = config.resolved_base_url();

        Self {
            client,
            config,
            base_url,
            token: Mutex::new(None),
        }
    }

    fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
        let lifetime = (expires_in - TOKEN_EXPIRY_BUFFER_SECS).max(TOKEN_MIN_LIFETIME_SECS);
        now + chrono::Duration::seconds(lifetime)
    }

    /// Returns a valid access token, refreshing it when the cached one is
    /// missing or inside its expiry buffer.
    async fn get_token(&self) -> Result<String, TravelSearchError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if Utc::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(TOKEN_TIMEOUT)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TravelSearchError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Amadeus token request failed with {}: {}", status, body);
            return Err(TravelSearchError::Auth(format!(
                "Token request failed with status {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TravelSearchError::Auth(format!("Malformed token response: {}", e)))?;
        let expires_at = Self::token_expiry(
            Utc::now(),
            token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        );
        info!(
            "Obtained new Amadeus token (env={}, expires at {})",
            self.config.environment, expires_at
        );
        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    /// Bearer-authenticated GET returning the provider's `data`/`meta`
    /// envelope, or `NotFound` when the answer carries no data.
    async fn search(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        empty_message: &str,
    ) -> Result<SearchResponse, TravelSearchError> {
        let token = self.get_token().await?;
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TravelSearchError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Amadeus request to {} failed with {}: {}", endpoint, status, body);
            return Err(TravelSearchError::Provider {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", status),
            });
        }

        let payload: Value = response.json().await.map_err(|e| TravelSearchError::Provider {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse response: {}", e),
        })?;

        match payload.get("data") {
            Some(data) if !data.is_null() => Ok(SearchResponse {
                data: data.clone(),
                meta: payload.get("meta").cloned().unwrap_or(Value::Null),
            }),
            _ => Err(TravelSearchError::NotFound(empty_message.to_string())),
        }
    }
}

#[async_trait]
impl OfferSearchProvider for AmadeusClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<SearchResponse, TravelSearchError> {
        let mut query: Vec<(&str, String)> = vec![
            ("originLocationCode", params.origin.clone()),
            ("destinationLocationCode", params.destination.clone()),
            ("departureDate", params.departure_date.clone()),
            ("adults", params.adults.to_string()),
            ("travelClass", params.travel_class.as_str().to_string()),
            ("currencyCode", "USD".to_string()),
            ("max", "50".to_string()),
        ];
        if let Some(return_date) = &params.return_date {
            query.push(("returnDate", return_date.clone()));
        }
        if let Some(airline) = &params.airline {
            query.push(("includedAirlineCodes", airline.clone()));
        }

        self.search("/v2/shopping/flight-offers", &query, "No flights found")
            .await
    }

    async fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> Result<SearchResponse, TravelSearchError> {
        let query: Vec<(&str, String)> = vec![
            ("cityCode", params.city_code.clone()),
            ("checkInDate", params.check_in_date.clone()),
            ("checkOutDate", params.check_out_date.clone()),
            ("adults", params.adults.to_string()),
            ("roomQuantity", params.room_quantity.to_string()),
        ];

        self.search("/v3/shopping/hotel-offers", &query, "No hotels found")
            .await
    }

    async fn search_activities(
        &self,
        params: &ActivitySearchParams,
    ) -> Result<SearchResponse, TravelSearchError> {
        let query: Vec<(&str, String)> = vec![
            ("latitude", params.latitude.to_string()),
            ("longitude", params.longitude.to_string()),
            ("radius", params.radius_km.to_string()),
        ];

        self.search("/v1/shopping/activities", &query, "No activities found")
            .await
    }

    async fn has_valid_token(&self) -> bool {
        self.get_token().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, base_url: Option<&str>) -> AmadeusConfig {
        AmadeusConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            environment: environment.to_string(),
            base_url: base_url.map(str::to_string),
        }
    }

    #[test]
    fn base_url_follows_environment() {
        assert_eq!(config("prod", None).resolved_base_url(), PROD_BASE_URL);
        assert_eq!(config("PROD", None).resolved_base_url(), PROD_BASE_URL);
        assert_eq!(config("test", None).resolved_base_url(), TEST_BASE_URL);
        assert_eq!(
            config("prod", Some("http://localhost:9090")).resolved_base_url(),
            "http://localhost:9090"
        );
    }

    #[test]
    fn token_expiry_applies_buffer_and_floor() {
        let now = Utc::now();
        // A standard 30-minute token renews 5 minutes early.
        assert_eq!(
            AmadeusClient::token_expiry(now, 1800),
            now + chrono::Duration::seconds(1500)
        );
        // Very short tokens still live for the minimum window.
        assert_eq!(
            AmadeusClient::token_expiry(now, 120),
            now + chrono::Duration::seconds(60)
        );
    }
}

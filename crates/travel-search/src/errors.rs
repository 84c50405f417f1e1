//! Error types for the travel search crate.

use thiserror::Error;

/// Errors that can occur while searching travel offers.
#[derive(Error, Debug)]
pub enum TravelSearchError {
    /// Could not obtain or refresh a provider access token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider rejected or failed the request.
    #[error("Provider error: {provider} - {message}")]
    Provider {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A search parameter failed validation. Terminal; the caller should
    /// surface it as a bad request.
    #[error("Invalid parameter: {0}")]
    InvalidParams(String),

    /// The provider answered but had no offers for the query.
    #[error("No results: {0}")]
    NotFound(String),

    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TravelSearchError {
    /// True when the error is the caller's fault rather than the
    /// provider's or ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParams(_))
    }
}

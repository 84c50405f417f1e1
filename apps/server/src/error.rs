//! HTTP error mapping for domain and provider errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tripsync_core::errors::{DatabaseError, Error};
use tripsync_travel_search::TravelSearchError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Response-side wrapper for anything a handler can fail with.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "request failed: {}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Membership(_) => StatusCode::FORBIDDEN,
            Error::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<TravelSearchError> for ApiError {
    fn from(err: TravelSearchError) -> Self {
        let status = match &err {
            TravelSearchError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            TravelSearchError::NotFound(_) => StatusCode::NOT_FOUND,
            TravelSearchError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            TravelSearchError::Auth(_)
            | TravelSearchError::Provider { .. }
            | TravelSearchError::Network(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripsync_core::errors::ValidationError;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases: Vec<(Error, StatusCode)> = vec![
            (
                Error::Validation(ValidationError::InvalidInput("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Membership("not a member".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                Error::Database(DatabaseError::NotFound("Trip x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                Error::Database(DatabaseError::UniqueViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                Error::Unexpected("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn search_errors_map_to_expected_statuses() {
        assert_eq!(
            ApiError::from(TravelSearchError::InvalidParams("radius".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TravelSearchError::NotFound("no flights".into())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TravelSearchError::Auth("denied".into())).status,
            StatusCode::BAD_GATEWAY
        );
    }
}

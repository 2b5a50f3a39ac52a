//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smartlight_domain::error::LightError;
use smartlight_domain::light::LightState;

/// JSON error body returned by the local endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    /// The winning state, for conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<LightState>,
}

/// Maps [`LightError`] to an HTTP status and JSON body.
#[derive(Debug)]
pub struct ApiError(pub LightError);

impl From<LightError> for ApiError {
    fn from(err: LightError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and body for this error.
    #[must_use]
    pub fn parts(&self) -> (StatusCode, ErrorBody) {
        let status = match &self.0 {
            LightError::Decode(err) => {
                tracing::debug!(error = %err, "rejected malformed local request");
                StatusCode::BAD_REQUEST
            }
            LightError::Conflict(_) => StatusCode::CONFLICT,
            LightError::StoreUnavailable(err) => {
                tracing::error!(error = %err, "write gate starved");
                StatusCode::SERVICE_UNAVAILABLE
            }
            LightError::Shutdown => StatusCode::SERVICE_UNAVAILABLE,
        };
        let error = match &self.0 {
            LightError::Decode(err) => err.to_string(),
            other => other.to_string(),
        };
        (
            status,
            ErrorBody {
                error,
                current: self.0.current().cloned(),
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlight_domain::error::{ConflictError, DecodeError, StoreUnavailableError};
    use std::time::Duration;

    #[test]
    fn should_map_decode_error_to_bad_request() {
        let (status, body) = ApiError(DecodeError::MissingField("power").into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "missing field `power`");
        assert!(body.current.is_none());
    }

    #[test]
    fn should_map_conflict_to_conflict_with_current_state() {
        let err = ConflictError {
            current: LightState::initial(),
        };
        let (status, body) = ApiError(err.into()).parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.current.map(|s| s.revision), Some(0));
    }

    #[test]
    fn should_map_store_unavailable_to_service_unavailable() {
        let err = StoreUnavailableError {
            waited: Duration::from_secs(5),
        };
        let (status, _) = ApiError(err.into()).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}

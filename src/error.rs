/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate status code and JSON body.
///
/// Taxonomy:
/// - validation errors → 400 with a static message
/// - feature mismatch → 400 carrying both feature sets
/// - not-found → 404
/// - external-service / store failures → 500 with the upstream message
///   exposed to the caller (preserved source behavior; see DESIGN.md)

use crate::clients::{GeocodeError, LabelError};
use crate::password::PasswordError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Selected features were not all found in the detected labels (400)
    FeatureMismatch {
        detected: Vec<String>,
        selected: Vec<String>,
    },

    /// An external service (labeler, geocoder, store) failed (500)
    Service(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "feature_mismatch")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Labels the image analysis produced (feature mismatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_features: Option<Vec<String>>,

    /// Features the caller selected (feature mismatch only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_features: Option<Vec<String>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::FeatureMismatch { selected, .. } => {
                write!(f, "Feature mismatch: {} selected features", selected.len())
            }
            ApiError::Service(msg) => write!(f, "Service error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, detected, selected) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None, None),
            ApiError::FeatureMismatch { detected, selected } => (
                StatusCode::BAD_REQUEST,
                "feature_mismatch",
                "not all features matched the image analysis".to_string(),
                Some(detected),
                Some(selected),
            ),
            ApiError::Service(msg) => {
                tracing::error!("external service failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "service_error",
                    msg,
                    None,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            detected_features: detected,
            selected_features: selected,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Service(err.to_string())
    }
}

impl From<LabelError> for ApiError {
    fn from(err: LabelError) -> Self {
        ApiError::Service(err.to_string())
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        ApiError::Service(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Service(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("missing fields".to_string());
        assert_eq!(err.to_string(), "Bad request: missing fields");

        let err = ApiError::NotFound("user not found".to_string());
        assert_eq!(err.to_string(), "Not found: user not found");
    }

    #[test]
    fn test_mismatch_body_carries_both_sets() {
        let err = ApiError::FeatureMismatch {
            detected: vec!["table".to_string()],
            selected: vec!["wifi".to_string()],
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_response_omits_empty_feature_fields() {
        let body = ErrorResponse {
            error: "bad_request".to_string(),
            message: "missing fields".to_string(),
            detected_features: None,
            selected_features: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("detected_features").is_none());
        assert!(json.get("selected_features").is_none());
    }
}

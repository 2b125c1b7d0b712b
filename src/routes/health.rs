/// Liveness endpoints
///
/// `GET /` keeps the plaintext liveness string the mobile clients ping;
/// `GET /health` adds a JSON variant with the build version.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,
}

/// Plaintext liveness handler for `GET /`
pub async fn home() -> &'static str {
    "placetag API is up"
}

/// JSON health handler for `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

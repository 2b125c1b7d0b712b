/// User endpoints
///
/// - `POST /signup` - Create (or overwrite) a user account
/// - `GET /user?email=` - Look up a stored user
///
/// Validation is presence-only: fields must exist and be non-empty, but no
/// email-format or uniqueness checks are made. Signing up twice with the
/// same email overwrites the earlier document (the store keys users by
/// email), which is the upsert behavior the mobile clients rely on.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    models::User,
    password,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Signup request; every field is required
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
}

/// Query parameters for `GET /user`
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

/// Rejects missing or empty required fields with a uniform 400
fn required(field: Option<String>) -> ApiResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::BadRequest("missing fields".to_string())),
    }
}

/// Signup handler
///
/// Hashes the password with Argon2id and writes the user keyed by email.
///
/// # Errors
///
/// - `400 Bad Request`: any of email/password/username missing or empty
/// - `500 Internal Server Error`: hashing or store failure
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let email = required(req.email)?;
    let plaintext = required(req.password)?;
    let username = required(req.username)?;

    let password_hash = password::hash(&plaintext)?;

    let user = User {
        email,
        username,
        password_hash,
    };
    state.store.put_user(&user).await?;

    tracing::info!(email = %user.email, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "user signed up successfully".to_string(),
        }),
    ))
}

/// User lookup handler
///
/// Returns the stored record for an email. The password hash is redacted
/// from the response (see `User`).
///
/// # Errors
///
/// - `400 Bad Request`: missing `email` query parameter
/// - `404 Not Found`: no user stored under that email
/// - `500 Internal Server Error`: store failure
pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<User>> {
    let email = required(query.email)?;

    let user = state
        .store
        .get_user(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(user))
}

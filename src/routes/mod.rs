/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness endpoints
/// - `users`: Signup and user lookup
/// - `places`: Save-place and feature queries

pub mod health;
pub mod places;
pub mod users;

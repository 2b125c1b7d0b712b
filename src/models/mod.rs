/// Domain models
///
/// This module contains the persistent entities, all of which live in the
/// external document store:
///
/// - `user`: User accounts keyed by email
/// - `place`: Places keyed by their coordinate pair, with coordinates and keys

pub mod place;
pub mod user;

pub use place::{GeoPoint, Place, PlaceKey};
pub use user::User;

/// User model
///
/// Users are stored in the document store's `users` collection, keyed by
/// email. Uniqueness comes from the key alone: writing a user with an
/// existing email overwrites the previous document (upsert semantics).
/// Accounts are created at signup and never updated or deleted by this
/// service.

use serde::Serialize;

/// A user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Email address; doubles as the document key
    pub email: String,

    /// Display name chosen at signup
    pub username: String,

    /// Argon2id password hash (PHC string)
    ///
    /// Skipped on serialization so the hash never leaks into an HTTP
    /// response; the store adapter writes it field-by-field instead.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

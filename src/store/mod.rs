/// Document store adapters
///
/// All persistent state lives in an external document database with two
/// keyed collections: `users` (keyed by email) and `places` (keyed by the
/// coordinate string). This module defines the [`Store`] trait the route
/// handlers depend on, plus two implementations:
///
/// - [`FirestoreStore`]: the production adapter speaking the Firestore
///   REST v1 protocol
/// - [`MemoryStore`]: a mutex-guarded in-process fake for tests
///
/// There is no local cache or write-ahead buffer; every call is a direct
/// round trip.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::features::FeatureSet;
use crate::models::{Place, PlaceKey, User};
use async_trait::async_trait;

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport-level failure talking to the store
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Create hit an existing document with the same key
    #[error("document already exists: {0}")]
    AlreadyExists(String),

    /// A document came back without the fields this service writes
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The store answered with an unexpected HTTP status
    #[error("store returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The conditional feature merge kept losing to concurrent writers
    #[error("feature merge for {0} kept failing on contention")]
    Contended(String),
}

/// Keyed access to the `users` and `places` collections
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes a user keyed by email, overwriting any existing document
    async fn put_user(&self, user: &User) -> Result<(), StoreError>;

    /// Fetches a user by email
    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fetches a place by its coordinate key
    async fn get_place(&self, key: &PlaceKey) -> Result<Option<Place>, StoreError>;

    /// Creates a place; fails with `AlreadyExists` if the key is taken
    async fn create_place(&self, place: &Place) -> Result<(), StoreError>;

    /// Atomically unions `features` into the stored set for `key`
    ///
    /// Only the `features` field is written back; name, address, and
    /// location stay from the first writer. Returns the merged set.
    /// Merging a subset of the stored set is a no-op on the document.
    async fn merge_place_features(
        &self,
        key: &PlaceKey,
        features: &FeatureSet,
    ) -> Result<FeatureSet, StoreError>;

    /// Streams the whole `places` collection
    async fn list_places(&self) -> Result<Vec<Place>, StoreError>;
}

/// In-memory document store
///
/// A mutex-guarded fake with the same contract as the Firestore adapter,
/// used by the integration tests (and handy for local development without
/// cloud credentials). The single lock makes `merge_place_features` atomic,
/// matching the conditional-update behavior of the real adapter.

use super::{Store, StoreError};
use crate::features::FeatureSet;
use crate::models::{Place, PlaceKey, User};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    places: BTreeMap<PlaceKey, Place>,
}

/// In-process store fake
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
    reads: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read operations served so far
    ///
    /// Lets tests assert that a rejected request never reached the store.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of place documents currently stored
    pub async fn place_count(&self) -> usize {
        self.inner.lock().await.places.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        // Keyed by email; overwrites are upserts, same as the real store
        inner.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().await;
        Ok(inner.users.get(email).cloned())
    }

    async fn get_place(&self, key: &PlaceKey) -> Result<Option<Place>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().await;
        Ok(inner.places.get(key).cloned())
    }

    async fn create_place(&self, place: &Place) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.places.contains_key(&place.key) {
            return Err(StoreError::AlreadyExists(place.key.to_string()));
        }
        inner.places.insert(place.key.clone(), place.clone());
        Ok(())
    }

    async fn merge_place_features(
        &self,
        key: &PlaceKey,
        features: &FeatureSet,
    ) -> Result<FeatureSet, StoreError> {
        let mut inner = self.inner.lock().await;
        let place = inner.places.get_mut(key).ok_or_else(|| StoreError::Status {
            code: 404,
            message: format!("place {} disappeared during merge", key),
        })?;

        place.features = place.features.merged(features);
        Ok(place.features.clone())
    }

    async fn list_places(&self) -> Result<Vec<Place>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.lock().await;
        Ok(inner.places.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use std::sync::Arc;

    fn place(key: &str, features: &[&str]) -> Place {
        Place {
            key: PlaceKey::from_raw(key),
            name: "Test Place".to_string(),
            address: "1 Main St".to_string(),
            location: GeoPoint {
                latitude: 1.0,
                longitude: 2.0,
            },
            features: FeatureSet::from_list(features.iter().copied()),
        }
    }

    #[tokio::test]
    async fn test_put_user_overwrites_existing() {
        let store = MemoryStore::new();
        let mut user = User {
            email: "a@example.com".to_string(),
            username: "first".to_string(),
            password_hash: "h1".to_string(),
        };

        store.put_user(&user).await.unwrap();
        user.username = "second".to_string();
        store.put_user(&user).await.unwrap();

        let stored = store.get_user("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.username, "second");
    }

    #[tokio::test]
    async fn test_create_place_rejects_duplicate_key() {
        let store = MemoryStore::new();
        store.create_place(&place("1_2", &["wifi"])).await.unwrap();

        let err = store
            .create_place(&place("1_2", &["parking"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_merge_unions_features() {
        let store = MemoryStore::new();
        store.create_place(&place("1_2", &["wifi"])).await.unwrap();

        let merged = store
            .merge_place_features(&PlaceKey::from_raw("1_2"), &FeatureSet::from_list(["parking"]))
            .await
            .unwrap();
        assert_eq!(merged.join(), "parking,wifi");

        let stored = store
            .get_place(&PlaceKey::from_raw("1_2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.features.join(), "parking,wifi");
    }

    #[tokio::test]
    async fn test_merge_with_subset_leaves_set_unchanged() {
        let store = MemoryStore::new();
        store
            .create_place(&place("1_2", &["wifi", "parking"]))
            .await
            .unwrap();

        let merged = store
            .merge_place_features(&PlaceKey::from_raw("1_2"), &FeatureSet::from_list(["wifi"]))
            .await
            .unwrap();
        assert_eq!(merged.join(), "parking,wifi");
    }

    #[tokio::test]
    async fn test_concurrent_merges_lose_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.create_place(&place("1_2", &["wifi"])).await.unwrap();

        let key = PlaceKey::from_raw("1_2");
        let a = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move {
                store
                    .merge_place_features(&key, &FeatureSet::from_list(["parking"]))
                    .await
            })
        };
        let b = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move {
                store
                    .merge_place_features(&key, &FeatureSet::from_list(["chair"]))
                    .await
            })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let stored = store.get_place(&key).await.unwrap().unwrap();
        assert_eq!(stored.features.join(), "chair,parking,wifi");
    }

    #[tokio::test]
    async fn test_read_count_tracks_reads() {
        let store = MemoryStore::new();
        assert_eq!(store.read_count(), 0);

        store.list_places().await.unwrap();
        store.get_user("nobody@example.com").await.unwrap();
        assert_eq!(store.read_count(), 2);
    }
}

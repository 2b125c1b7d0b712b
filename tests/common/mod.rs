/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A `TestContext` wiring the router to an in-memory store and stub
///   geocoder/labeler adapters
/// - Request helpers driving the router through `tower::Service`
/// - Seed helpers for pre-populating the place collection

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use placetag::app::{build_router, AppState};
use placetag::clients::{GeocodeError, Geocoder, ImageLabeler, LabelError};
use placetag::config::{ApiConfig, Config, FirestoreConfig, GoogleConfig};
use placetag::features::FeatureSet;
use placetag::models::{GeoPoint, Place, PlaceKey};
use placetag::store::{MemoryStore, Store};
use std::sync::Arc;
use tower::Service as _;

/// Geocoder stub returning a fixed answer
pub struct StubGeocoder {
    point: Option<GeoPoint>,
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, _address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(self.point)
    }
}

/// Labeler stub returning fixed labels or a fixed failure
pub struct StubLabeler {
    result: Result<Vec<String>, String>,
}

#[async_trait]
impl ImageLabeler for StubLabeler {
    async fn label(&self, _image: &[u8]) -> Result<Vec<String>, LabelError> {
        match &self.result {
            Ok(labels) => Ok(labels.clone()),
            Err(message) => Err(LabelError::Service(message.clone())),
        }
    }
}

/// Test context containing the router and its backing fake store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    /// Context with default labels and a fixed geocoding result
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestContextBuilder {
        TestContextBuilder {
            labels: Ok(vec![
                "Office chair".to_string(),
                "Desk".to_string(),
                "Free wifi zone".to_string(),
                "Parking lot".to_string(),
            ]),
            point: Some(GeoPoint {
                latitude: 37.4224764,
                longitude: -122.0842499,
            }),
        }
    }
}

pub struct TestContextBuilder {
    labels: Result<Vec<String>, String>,
    point: Option<GeoPoint>,
}

impl TestContextBuilder {
    /// Labels the stub labeler will detect
    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.labels = Ok(labels.iter().map(|label| label.to_string()).collect());
        self
    }

    /// Makes the stub labeler fail with a service error
    pub fn failing_labeler(mut self, message: &str) -> Self {
        self.labels = Err(message.to_string());
        self
    }

    /// Makes the stub geocoder find no coordinates
    pub fn geocoder_miss(mut self) -> Self {
        self.point = None;
        self
    }

    /// Coordinates the stub geocoder resolves every address to
    pub fn point(mut self, latitude: f64, longitude: f64) -> Self {
        self.point = Some(GeoPoint {
            latitude,
            longitude,
        });
        self
    }

    pub fn build(self) -> TestContext {
        let store = Arc::new(MemoryStore::new());

        let state = AppState::new(
            store.clone(),
            Arc::new(StubGeocoder { point: self.point }),
            Arc::new(StubLabeler {
                result: self.labels,
            }),
            test_config(),
        );

        TestContext {
            app: build_router(state),
            store,
        }
    }
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        firestore: FirestoreConfig {
            project_id: "test-project".to_string(),
            base_url: None,
            auth_token: None,
        },
        google: GoogleConfig {
            geocoding_api_key: "test-geo-key".to_string(),
            geocoding_base_url: None,
            vision_api_key: "test-vision-key".to_string(),
            vision_base_url: None,
            max_labels: 10,
        },
    }
}

/// Sends a request and returns the status plus raw body bytes
pub async fn send(ctx: &TestContext, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

/// Sends a request with a JSON body and parses the JSON response
pub async fn send_json(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let (status, bytes) = send(ctx, request).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Sends a bodyless GET and parses the JSON response
pub async fn get_json(ctx: &TestContext, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(ctx, request).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// A small base64 payload standing in for a photo
pub fn image_payload() -> String {
    BASE64.encode(b"not a real jpeg, but the stub labeler does not care")
}

/// Pre-populates the place collection directly through the store
pub async fn seed_place(
    store: &MemoryStore,
    latitude: f64,
    longitude: f64,
    name: &str,
    features: &[&str],
) {
    let location = GeoPoint {
        latitude,
        longitude,
    };
    store
        .create_place(&Place {
            key: PlaceKey::from_point(location),
            name: name.to_string(),
            address: format!("{} address", name),
            location,
            features: FeatureSet::from_list(features.iter().copied()),
        })
        .await
        .unwrap();
}

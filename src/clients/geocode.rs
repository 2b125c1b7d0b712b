/// Geocoding adapter
///
/// Resolves a postal address to latitude/longitude via the Google Maps
/// Geocoding API. The first result wins; an empty result list means the
/// address could not be resolved and surfaces as `Ok(None)` so the caller
/// can reject the submission without persisting anything.

use crate::models::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Error type for geocoding operations
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Transport-level failure talking to the service
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-OK payload status
    #[error("geocoding service returned status {0}")]
    Status(String),
}

/// Resolves postal addresses to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `address`; `Ok(None)` when the service finds no match
    async fn resolve(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}

/// Google Maps Geocoding API client
pub struct GoogleGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Creates a client; `base_url` overrides the public endpoint
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("address", address), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        extract_point(response)
    }
}

/// Geocoding API response envelope
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Pulls the first result's coordinates out of a response
///
/// `ZERO_RESULTS` (or an OK status with an empty list) is a miss, not an
/// error; any other non-OK status is a service failure.
fn extract_point(response: GeocodeResponse) -> Result<Option<GeoPoint>, GeocodeError> {
    match response.status.as_str() {
        "OK" => Ok(response.results.first().map(|result| GeoPoint {
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
        })),
        "ZERO_RESULTS" => Ok(None),
        other => Err(GeocodeError::Status(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_from(value: serde_json::Value) -> GeocodeResponse {
        serde_json::from_value(value).expect("Fixture should deserialize")
    }

    #[test]
    fn test_extract_first_result() {
        let response = response_from(json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 37.4224764, "lng": -122.0842499 } } },
                { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } }
            ]
        }));

        let point = extract_point(response).unwrap().unwrap();
        assert_eq!(point.latitude, 37.4224764);
        assert_eq!(point.longitude, -122.0842499);
    }

    #[test]
    fn test_zero_results_is_a_miss() {
        let response = response_from(json!({ "status": "ZERO_RESULTS", "results": [] }));
        assert!(extract_point(response).unwrap().is_none());
    }

    #[test]
    fn test_ok_with_empty_results_is_a_miss() {
        let response = response_from(json!({ "status": "OK", "results": [] }));
        assert!(extract_point(response).unwrap().is_none());
    }

    #[test]
    fn test_denied_status_is_an_error() {
        let response = response_from(json!({ "status": "REQUEST_DENIED" }));
        let err = extract_point(response).unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }
}

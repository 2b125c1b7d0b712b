/// Place endpoints
///
/// - `POST /save-place` - Verify a photo against selected features and persist
/// - `GET /places` - List places carrying at least one requested feature
/// - `GET /all-places` - List every place with its full feature set
///
/// Save-place runs three external calls in sequence (labeler, geocoder,
/// store) with no rollback between them; nothing is written until the final
/// step, so an early failure leaves no partial state behind.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    features::{normalize_list, FeatureSet},
    models::{GeoPoint, Place, PlaceKey},
    store::StoreError,
};
use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Save-place request; every field is required
#[derive(Debug, Deserialize)]
pub struct SavePlaceRequest {
    pub name: Option<String>,
    pub address: Option<String>,

    /// Features the user claims the place has
    pub features: Option<Vec<String>>,

    /// Base64-encoded photo backing up the claim
    pub image: Option<String>,
}

/// Save-place response; shape depends on whether the place already existed
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SavePlaceResponse {
    /// A new place document was created
    Created {
        message: String,
        detected_features: Vec<String>,
        selected_features: Vec<String>,
    },

    /// The submission merged into an existing place at the same coordinates
    Merged {
        message: String,
        merged_features: Vec<String>,
        detected_features: Vec<String>,
    },
}

/// `GET /places` request: a single comma-delimited feature string
/// (unlike save-place, which takes a list)
#[derive(Debug, Deserialize)]
pub struct ListPlacesRequest {
    pub features: Option<String>,
}

/// Listing envelope for both `/places` and `/all-places`
#[derive(Debug, Serialize)]
pub struct ListPlacesResponse {
    pub status: String,
    pub data: Vec<PlaceView>,
}

/// One place in a listing
#[derive(Debug, Serialize)]
pub struct PlaceView {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub features: Vec<String>,
}

fn required<T>(field: Option<T>, check: impl Fn(&T) -> bool) -> ApiResult<T> {
    match field {
        Some(value) if check(&value) => Ok(value),
        _ => Err(ApiError::BadRequest("missing fields".to_string())),
    }
}

/// Save-place handler
///
/// Steps, in order: decode the image, label it, check every selected
/// feature against the labels (substring containment, see
/// `FeatureSet::matched_by`), geocode the address, then create the place
/// or merge features into the existing document at the same coordinates.
///
/// # Errors
///
/// - `400 Bad Request`: missing fields, undecodable image, feature
///   mismatch (body carries both feature sets), or unresolvable address
/// - `500 Internal Server Error`: labeler, geocoder, or store failure
pub async fn save_place(
    State(state): State<AppState>,
    Json(req): Json<SavePlaceRequest>,
) -> ApiResult<Json<SavePlaceResponse>> {
    let name = required(req.name, |name| !name.trim().is_empty())?;
    let address = required(req.address, |address| !address.trim().is_empty())?;
    let selected_raw = required(req.features, |features| !features.is_empty())?;
    let image_base64 = required(req.image, |image| !image.trim().is_empty())?;

    let image = BASE64
        .decode(image_base64.trim())
        .map_err(|_| ApiError::BadRequest("invalid image data".to_string()))?;

    let detected = state.labeler.label(&image).await?;
    tracing::debug!(labels = ?detected, "image labels detected");

    let selected = FeatureSet::from_list(&selected_raw);
    if selected.is_empty() {
        return Err(ApiError::BadRequest("missing fields".to_string()));
    }

    let detected_normalized = normalize_list(&detected);
    if !selected.matched_by(&detected_normalized) {
        return Err(ApiError::FeatureMismatch {
            detected,
            selected: selected_raw,
        });
    }

    let location = state
        .geocoder
        .resolve(&address)
        .await?
        .ok_or_else(|| ApiError::BadRequest("unable to resolve address to coordinates".to_string()))?;

    let key = PlaceKey::from_point(location);

    if state.store.get_place(&key).await?.is_some() {
        let merged = state.store.merge_place_features(&key, &selected).await?;
        tracing::info!(key = %key, "merged features into existing place");

        return Ok(Json(SavePlaceResponse::Merged {
            message: "place updated successfully".to_string(),
            merged_features: merged.to_vec(),
            detected_features: detected,
        }));
    }

    let place = Place {
        key: key.clone(),
        name,
        address,
        location,
        features: selected.clone(),
    };

    match state.store.create_place(&place).await {
        Ok(()) => {
            tracing::info!(key = %key, "place created");
            Ok(Json(SavePlaceResponse::Created {
                message: "place added successfully".to_string(),
                detected_features: detected,
                selected_features: selected_raw,
            }))
        }
        // Another submission won the creation race; merge into it instead
        Err(StoreError::AlreadyExists(_)) => {
            let merged = state.store.merge_place_features(&key, &selected).await?;
            Ok(Json(SavePlaceResponse::Merged {
                message: "place updated successfully".to_string(),
                merged_features: merged.to_vec(),
                detected_features: detected,
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// List-by-feature handler
///
/// Scans the whole collection (no server-side filter exists on the
/// comma-joined feature string) and keeps places whose stored set
/// intersects the requested one; each result carries only the
/// intersecting subset.
///
/// # Errors
///
/// - `400 Bad Request`: empty or whitespace-only feature string,
///   rejected before any store access
/// - `500 Internal Server Error`: store failure
pub async fn list_places(
    State(state): State<AppState>,
    Json(req): Json<ListPlacesRequest>,
) -> ApiResult<Json<ListPlacesResponse>> {
    let raw = req.features.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(ApiError::BadRequest("no feature(s) provided".to_string()));
    }

    let requested = FeatureSet::parse(&raw);

    let data = state
        .store
        .list_places()
        .await?
        .into_iter()
        .filter_map(|place| {
            let present = place.features.intersect(&requested);
            if present.is_empty() {
                None
            } else {
                Some(PlaceView {
                    name: place.name,
                    address: place.address,
                    location: place.location,
                    features: present.to_vec(),
                })
            }
        })
        .collect();

    Ok(Json(ListPlacesResponse {
        status: "success".to_string(),
        data,
    }))
}

/// List-all handler: the full collection, complete feature sets
///
/// # Errors
///
/// - `500 Internal Server Error`: store failure
pub async fn all_places(State(state): State<AppState>) -> ApiResult<Json<ListPlacesResponse>> {
    let data = state
        .store
        .list_places()
        .await?
        .into_iter()
        .map(|place| PlaceView {
            name: place.name,
            address: place.address,
            location: place.location,
            features: place.features.to_vec(),
        })
        .collect();

    Ok(Json(ListPlacesResponse {
        status: "success".to_string(),
        data,
    }))
}

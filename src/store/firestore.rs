/// Firestore REST adapter
///
/// Speaks the Firestore REST v1 document protocol: typed field values
/// (`stringValue`, `geoPointValue`), `PATCH` upserts, `documentId` creates,
/// and conditional updates via `updateMask` + `currentDocument.updateTime`
/// preconditions. An optional bearer token covers production access; the
/// emulator needs none, so the token and base URL are both injectable.
///
/// Documents are stored exactly the way the mobile clients expect them:
/// users under `users/<email>`, places under `places/<lat>_<lon>` with the
/// feature set serialized as a comma-joined string field.

use super::{Store, StoreError};
use crate::config::FirestoreConfig;
use crate::features::FeatureSet;
use crate::models::{GeoPoint, Place, PlaceKey, User};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const PUBLIC_HOST: &str = "https://firestore.googleapis.com";

/// Bounded retries for the conditional feature merge
const MERGE_ATTEMPTS: usize = 4;

/// Firestore-backed document store
pub struct FirestoreStore {
    http: reqwest::Client,
    root: String,
    auth_token: Option<String>,
}

impl FirestoreStore {
    /// Creates an adapter for the configured project
    pub fn new(http: reqwest::Client, config: &FirestoreConfig) -> Self {
        let host = config
            .base_url
            .as_deref()
            .unwrap_or(PUBLIC_HOST)
            .trim_end_matches('/')
            .to_string();

        Self {
            http,
            root: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                host, config.project_id
            ),
            auth_token: config.auth_token.clone(),
        }
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.root, collection, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<Option<Document>, StoreError> {
        let response = self.authorize(self.http.get(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(status_error(response).await),
        }
    }
}

#[async_trait]
impl Store for FirestoreStore {
    async fn put_user(&self, user: &User) -> Result<(), StoreError> {
        // Unconditional PATCH is Firestore's upsert: a second signup with
        // the same email overwrites the first document.
        let response = self
            .authorize(self.http.patch(self.doc_url("users", &user.email)))
            .json(&json!({ "fields": user_fields(user) }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let document = self.fetch_document(&self.doc_url("users", email)).await?;
        document.map(decode_user).transpose()
    }

    async fn get_place(&self, key: &PlaceKey) -> Result<Option<Place>, StoreError> {
        let document = self
            .fetch_document(&self.doc_url("places", key.as_str()))
            .await?;
        document.map(decode_place).transpose()
    }

    async fn create_place(&self, place: &Place) -> Result<(), StoreError> {
        let response = self
            .authorize(self.http.post(format!("{}/places", self.root)))
            .query(&[("documentId", place.key.as_str())])
            .json(&json!({ "fields": place_fields(place) }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(StoreError::AlreadyExists(place.key.to_string())),
            _ => Err(status_error(response).await),
        }
    }

    async fn merge_place_features(
        &self,
        key: &PlaceKey,
        features: &FeatureSet,
    ) -> Result<FeatureSet, StoreError> {
        let url = self.doc_url("places", key.as_str());

        for _ in 0..MERGE_ATTEMPTS {
            let document = self
                .fetch_document(&url)
                .await?
                .ok_or_else(|| StoreError::Status {
                    code: 404,
                    message: format!("place {} disappeared during merge", key),
                })?;

            let stored = FeatureSet::parse(&string_field(&document.fields, "features")?);
            let merged = stored.merged(features);
            if merged == stored {
                // Nothing new; skip the write entirely
                return Ok(merged);
            }

            let update_time = document.update_time.ok_or_else(|| {
                StoreError::Malformed("document missing updateTime".to_string())
            })?;

            // Precondition makes the read-modify-write atomic: if another
            // writer merged in between, the PATCH fails and we re-read.
            let response = self
                .authorize(self.http.patch(&url))
                .query(&[
                    ("updateMask.fieldPaths", "features"),
                    ("currentDocument.updateTime", update_time.as_str()),
                ])
                .json(&json!({
                    "fields": { "features": { "stringValue": merged.join() } }
                }))
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => return Ok(merged),
                // FAILED_PRECONDITION / ABORTED surface as 400/409/412
                StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                    continue;
                }
                _ => return Err(status_error(response).await),
            }
        }

        Err(StoreError::Contended(key.to_string()))
    }

    async fn list_places(&self) -> Result<Vec<Place>, StoreError> {
        let mut places = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(format!("{}/places", self.root));
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self.authorize(request).send().await?;
            if !response.status().is_success() {
                return Err(status_error(response).await);
            }

            let page: ListDocumentsResponse = response.json().await?;
            for document in page.documents {
                places.push(decode_place(document)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(places)
    }
}

/// A Firestore REST document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    /// Full resource name; the document id is the last path segment
    name: String,

    #[serde(default)]
    fields: Map<String, Value>,

    update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,

    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    message: String,
}

async fn status_error(response: reqwest::Response) -> StoreError {
    let code = response.status().as_u16();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => "unreadable error body".to_string(),
    };

    StoreError::Status { code, message }
}

fn doc_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

fn user_fields(user: &User) -> Value {
    json!({
        "email": string_value(&user.email),
        "username": string_value(&user.username),
        "password_hash": string_value(&user.password_hash),
    })
}

fn place_fields(place: &Place) -> Value {
    json!({
        "name": string_value(&place.name),
        "address": string_value(&place.address),
        "location": {
            "geoPointValue": {
                "latitude": place.location.latitude,
                "longitude": place.location.longitude,
            }
        },
        "features": string_value(&place.features.join()),
    })
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, StoreError> {
    fields
        .get(name)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| StoreError::Malformed(format!("missing string field '{}'", name)))
}

fn geo_field(fields: &Map<String, Value>, name: &str) -> Result<GeoPoint, StoreError> {
    let point = fields
        .get(name)
        .and_then(|value| value.get("geoPointValue"))
        .ok_or_else(|| StoreError::Malformed(format!("missing geo field '{}'", name)))?;

    // Proto3 JSON omits zero-valued coordinates
    Ok(GeoPoint {
        latitude: point.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
        longitude: point.get("longitude").and_then(Value::as_f64).unwrap_or(0.0),
    })
}

fn decode_user(document: Document) -> Result<User, StoreError> {
    Ok(User {
        email: string_field(&document.fields, "email")?,
        username: string_field(&document.fields, "username")?,
        password_hash: string_field(&document.fields, "password_hash")?,
    })
}

fn decode_place(document: Document) -> Result<Place, StoreError> {
    let key = PlaceKey::from_raw(doc_id(&document.name));

    Ok(Place {
        name: string_field(&document.fields, "name")?,
        address: string_field(&document.fields, "address")?,
        location: geo_field(&document.fields, "location")?,
        features: FeatureSet::parse(&string_field(&document.fields, "features")?),
        key,
    })
}

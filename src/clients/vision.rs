/// Image labeling adapter
///
/// Extracts descriptive labels from a photo via the Google Vision
/// `images:annotate` endpoint with a LABEL_DETECTION feature request.
/// The detected labels are what user-selected features are matched
/// against before a place is persisted.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Error type for image labeling operations
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// Transport-level failure talking to the service
    #[error("vision request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service processed the request but reported an error for the image
    #[error("vision service error: {0}")]
    Service(String),
}

/// Extracts descriptive labels from image bytes
#[async_trait]
pub trait ImageLabeler: Send + Sync {
    /// Labels `image`, returning the raw label descriptions in service order
    async fn label(&self, image: &[u8]) -> Result<Vec<String>, LabelError>;
}

/// Google Vision API label-detection client
pub struct GoogleVisionLabeler {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_labels: u32,
}

impl GoogleVisionLabeler {
    /// Creates a client; `base_url` overrides the public endpoint
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        max_labels: u32,
    ) -> Self {
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: api_key.into(),
            max_labels,
        }
    }
}

#[async_trait]
impl ImageLabeler for GoogleVisionLabeler {
    async fn label(&self, image: &[u8]) -> Result<Vec<String>, LabelError> {
        let body = json!({
            "requests": [{
                "image": { "content": BASE64.encode(image) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_labels }]
            }]
        });

        let response = self
            .http
            .post(&self.base_url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<AnnotateResponse>()
            .await?;

        extract_labels(response)
    }
}

/// `images:annotate` response envelope
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    message: String,
}

/// Pulls label descriptions out of the first per-image result
///
/// A per-image `error` object takes precedence over any labels the service
/// may also have returned.
fn extract_labels(response: AnnotateResponse) -> Result<Vec<String>, LabelError> {
    let result = response.responses.into_iter().next().unwrap_or_default();

    if let Some(status) = result.error {
        return Err(LabelError::Service(status.message));
    }

    Ok(result
        .label_annotations
        .into_iter()
        .map(|label| label.description)
        .collect())
}

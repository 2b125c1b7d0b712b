/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `FIRESTORE_PROJECT_ID`: Google Cloud project holding the document store (required)
/// - `FIRESTORE_BASE_URL`: Override for the Firestore REST endpoint (emulator)
/// - `FIRESTORE_AUTH_TOKEN`: OAuth bearer token for Firestore (not needed for the emulator)
/// - `GEOCODING_API_KEY`: Google Maps Geocoding API key (required)
/// - `GEOCODING_BASE_URL`: Override for the geocoding endpoint
/// - `VISION_API_KEY`: Google Vision API key (required)
/// - `VISION_BASE_URL`: Override for the vision endpoint
/// - `VISION_MAX_LABELS`: Maximum labels requested per image (default: 10)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use placetag::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Document store configuration
    pub firestore: FirestoreConfig,

    /// Google Maps / Vision API configuration
    pub google: GoogleConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Firestore document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project holding the `users` and `places` collections
    pub project_id: String,

    /// Endpoint override, mainly for the local emulator
    pub base_url: Option<String>,

    /// OAuth bearer token; omitted when talking to the emulator
    pub auth_token: Option<String>,
}

/// Geocoding and image-labeling service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Geocoding API key
    pub geocoding_api_key: String,

    /// Geocoding endpoint override
    pub geocoding_base_url: Option<String>,

    /// Vision API key
    pub vision_api_key: String,

    /// Vision endpoint override
    pub vision_base_url: Option<String>,

    /// Maximum labels requested per image
    pub max_labels: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let project_id = env::var("FIRESTORE_PROJECT_ID")
            .map_err(|_| anyhow::anyhow!("FIRESTORE_PROJECT_ID environment variable is required"))?;

        let geocoding_api_key = env::var("GEOCODING_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEOCODING_API_KEY environment variable is required"))?;

        let vision_api_key = env::var("VISION_API_KEY")
            .map_err(|_| anyhow::anyhow!("VISION_API_KEY environment variable is required"))?;

        let max_labels = env::var("VISION_MAX_LABELS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            firestore: FirestoreConfig {
                project_id,
                base_url: env::var("FIRESTORE_BASE_URL").ok(),
                auth_token: env::var("FIRESTORE_AUTH_TOKEN").ok(),
            },
            google: GoogleConfig {
                geocoding_api_key,
                geocoding_base_url: env::var("GEOCODING_BASE_URL").ok(),
                vision_api_key,
                vision_base_url: env::var("VISION_BASE_URL").ok(),
                max_labels,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware. The external
/// clients are trait objects injected at construction time, so tests swap
/// in in-process fakes without touching any cloud service.
///
/// # Example
///
/// ```no_run
/// use placetag::app::{build_router, AppState};
/// use placetag::clients::{GoogleGeocoder, GoogleVisionLabeler};
/// use placetag::config::Config;
/// use placetag::store::FirestoreStore;
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let http = reqwest::Client::new();
///
/// let state = AppState::new(
///     Arc::new(FirestoreStore::new(http.clone(), &config.firestore)),
///     Arc::new(GoogleGeocoder::new(
///         http.clone(),
///         config.google.geocoding_api_key.clone(),
///         config.google.geocoding_base_url.clone(),
///     )),
///     Arc::new(GoogleVisionLabeler::new(
///         http,
///         config.google.vision_api_key.clone(),
///         config.google.vision_base_url.clone(),
///         config.google.max_labels,
///     )),
///     config,
/// );
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::clients::{Geocoder, ImageLabeler};
use crate::config::Config;
use crate::routes;
use crate::store::Store;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding the `users` and `places` collections
    pub store: Arc<dyn Store>,

    /// Address-to-coordinates resolver
    pub geocoder: Arc<dyn Geocoder>,

    /// Photo label extractor
    pub labeler: Arc<dyn ImageLabeler>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state from injected clients
    pub fn new(
        store: Arc<dyn Store>,
        geocoder: Arc<dyn Geocoder>,
        labeler: Arc<dyn ImageLabeler>,
        config: Config,
    ) -> Self {
        Self {
            store,
            geocoder,
            labeler,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET  /            # Plaintext liveness
/// GET  /health      # JSON liveness
/// POST /signup      # Create a user account
/// GET  /user        # Look up a user by email (query param)
/// POST /save-place  # Verify a photo and persist a place
/// GET  /places      # List places matching requested features
/// GET  /all-places  # List every place
/// ```
///
/// Middleware: request tracing via tower-http's `TraceLayer`, permissive
/// CORS (the callers are mobile apps with no cookie credentials).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::home))
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::users::signup))
        .route("/user", get(routes::users::get_user))
        .route("/save-place", post(routes::places::save_place))
        .route("/places", get(routes::places::list_places))
        .route("/all-places", get(routes::places::all_places))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! # Placetag API Server
//!
//! HTTP backend for photo-tagged places: users register accounts, upload
//! places whose selected features are checked against image-analysis
//! labels, and query places by feature. Persistence, geocoding, and image
//! labeling are all delegated to external services; this binary wires the
//! adapters together and serves the routes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use placetag::app::{build_router, AppState};
use placetag::clients::{GoogleGeocoder, GoogleVisionLabeler};
use placetag::config::Config;
use placetag::store::FirestoreStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "placetag=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Placetag API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // One shared HTTP client across all three adapters
    let http = reqwest::Client::new();

    let state = AppState::new(
        Arc::new(FirestoreStore::new(http.clone(), &config.firestore)),
        Arc::new(GoogleGeocoder::new(
            http.clone(),
            config.google.geocoding_api_key.clone(),
            config.google.geocoding_base_url.clone(),
        )),
        Arc::new(GoogleVisionLabeler::new(
            http,
            config.google.vision_api_key.clone(),
            config.google.vision_base_url.clone(),
            config.google.max_labels,
        )),
        config.clone(),
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

//! HTTP service for deck generation.
//!
//! `GET /health` reports liveness; `POST /generate` accepts a JSON prompt
//! (or a legacy multipart XML upload) and answers with a .pptx file.

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use deckgen_core::{Error, Result, SlideSource};
use deckgen_llm::ChatClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub default_source: SlideSource,

    /// Present only when a model API key is configured.
    pub client: Option<ChatClient>,

    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = match ChatClient::new(config.model.clone()) {
            Ok(client) => {
                log::info!(
                    "Model source enabled ({} at {})",
                    config.model.model,
                    config.model.endpoint
                );
                Some(client)
            }
            Err(Error::ModelUnavailable(reason)) => {
                log::info!("Model source disabled: {}", reason);
                None
            }
            Err(e) => return Err(e),
        };

        if config.default_source == SlideSource::Model && client.is_none() {
            log::warn!("Default source is model but no model is configured");
        }

        Ok(Self {
            default_source: config.default_source,
            client,
            cors_origins: config.cors_origins.clone(),
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(routes::health))
        .route("/generate", post(routes::generate))
        .layer(cors)
        .with_state(Arc::new(state))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Bind to the configured address and serve until the process exits.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.addr()?;
    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(addr).await?;
    log::info!("Slide generator listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

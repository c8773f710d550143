//! storyline-wizard library interface
//!
//! Exposes the router and stage services for the binary and for integration
//! tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use storyline_common::auth::CredentialStore;
use storyline_common::config::TomlConfig;
use tokio::sync::RwLock;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::services::{
    ChatBackend, DraftWriter, ImageBackend, ImageGenerator, MaterialExtractor, OpenAiChatClient,
    OpenAiImageClient, WordPressClient,
};
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TomlConfig>,
    pub credentials: Arc<CredentialStore>,
    pub sessions: SessionStore,
    pub extractor: Arc<MaterialExtractor>,
    pub drafts: Arc<DraftWriter>,
    pub images: Arc<ImageGenerator>,
    pub publisher: Arc<WordPressClient>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last upstream error, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Wire the stages to the given backends
    pub fn new(
        config: TomlConfig,
        credentials: CredentialStore,
        llm: Arc<dyn ChatBackend>,
        image_backend: Option<Arc<dyn ImageBackend>>,
        publisher: WordPressClient,
    ) -> Self {
        let extractor = MaterialExtractor::new(llm.clone(), config.analysis.clone());
        let drafts = DraftWriter::new(llm, config.draft.clone(), config.brand.clone(), config.llm.top_p);
        let images = ImageGenerator::new(image_backend, config.image.clone());

        Self {
            sessions: SessionStore::new(config.auth.session_ttl_hours),
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            extractor: Arc::new(extractor),
            drafts: Arc::new(drafts),
            images: Arc::new(images),
            publisher: Arc::new(publisher),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Real HTTP clients built from configuration
    pub fn from_config(config: TomlConfig, credentials: CredentialStore) -> anyhow::Result<Self> {
        let llm = Arc::new(OpenAiChatClient::new(&config.llm)?);
        let image_backend: Arc<dyn ImageBackend> =
            Arc::new(OpenAiImageClient::new(&config.llm, &config.image)?);
        let publisher = WordPressClient::new(&config.wordpress)?;
        Ok(Self::new(config, credentials, llm, Some(image_backend), publisher))
    }

    /// Remember an upstream failure for `/health`
    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    // Room for multipart framing on top of the file itself
    let body_limit = (state.config.upload.max_size_mb as usize + 1) * 1024 * 1024;

    // Protected routes (require a session)
    let protected = Router::new()
        .merge(api::session_routes())
        .merge(api::workflow_routes())
        .merge(api::upload_routes())
        .merge(api::materials_routes())
        .merge(api::draft_routes())
        .merge(api::image_routes())
        .merge(api::publish_routes())
        .layer(middleware::from_fn_with_state(state.clone(), api::auth_middleware));

    // Public routes (no authentication)
    let public = Router::new()
        .merge(api::ui_routes())
        .merge(api::login_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use std::sync::Arc;

use vidsqueeze_cloud::genai::TextGenerator;
use vidsqueeze_cloud::media::MediaProvider;

use crate::auth::session::SessionVerifier;
use crate::config::ServerConfig;
use crate::error::AppError;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vidsqueeze_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session token verifier used by the access gate.
    pub sessions: Arc<SessionVerifier>,
    /// Media service; `None` when credentials are missing.
    pub media: Option<Arc<dyn MediaProvider>>,
    /// Text generation service; `None` when no API key is set.
    pub text: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    /// The media service, or a configuration error naming it.
    pub fn media(&self) -> Result<&Arc<dyn MediaProvider>, AppError> {
        self.media.as_ref().ok_or(AppError::Config("Media service"))
    }

    /// The text generation service, or a configuration error naming it.
    pub fn text(&self) -> Result<&Arc<dyn TextGenerator>, AppError> {
        self.text
            .as_ref()
            .ok_or(AppError::Config("Text generation service"))
    }
}

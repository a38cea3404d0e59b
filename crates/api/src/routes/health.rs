use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether media service credentials are configured.
    pub media_configured: bool,
    /// Whether a text generation API key is configured.
    pub text_configured: bool,
}

/// GET /health -- returns service and dependency health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = vidsqueeze_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_configured: state.media.is_some(),
        text_configured: state.text.is_some(),
    })
}

/// Mount health check routes (root level, outside the access gate).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

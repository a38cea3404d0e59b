use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for the suggestion endpoint.
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub completion: String,
}

/// POST /api/suggest
///
/// Forward a prompt to the text generator. No retries; an overloaded model
/// is reported as 503 so the client can decide when to try again.
pub async fn suggest(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<SuggestRequest>,
) -> AppResult<Json<SuggestResponse>> {
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Prompt is required".into()))?;

    let text = state.text()?;

    tracing::debug!(user_id = %user.user_id, prompt_len = prompt.len(), "Generating suggestion");

    let completion = text.generate(&prompt).await.map_err(|e| {
        if e.is_overloaded() {
            AppError::Overloaded("The model is overloaded. Please try again later.".into())
        } else {
            AppError::Upstream {
                message: "Failed to generate completion".into(),
                detail: e.to_string(),
            }
        }
    })?;

    Ok(Json(SuggestResponse { completion }))
}

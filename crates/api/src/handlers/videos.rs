use axum::extract::State;
use axum::Json;
use vidsqueeze_core::video::VideoRecord;
use vidsqueeze_db::repositories::VideoRepo;

use crate::error::AppResult;
use crate::middleware::auth::MaybeUser;
use crate::state::AppState;

/// GET /api/videos
///
/// Every video, newest first, in the normalized record shape. Public.
pub async fn list_videos(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
) -> AppResult<Json<Vec<VideoRecord>>> {
    let videos = VideoRepo::list_recent(&state.pool).await?;
    tracing::debug!(
        count = videos.len(),
        signed_in = viewer.is_some(),
        "Listing videos"
    );
    Ok(Json(videos.into_iter().map(|v| v.into_record()).collect()))
}

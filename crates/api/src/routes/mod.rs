pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// GET    /api/videos                 list_videos (public)
/// POST   /api/video-upload           upload_video (multipart)
/// DELETE /api/video-upload           400, id missing
/// DELETE /api/video-upload/{id}      delete_video
/// POST   /api/image-upload           upload_image (multipart)
/// POST   /api/suggest                suggest
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(handlers::videos::list_videos))
        .route(
            "/video-upload",
            post(handlers::video_upload::upload_video)
                .delete(handlers::video_upload::delete_without_id),
        )
        .route(
            "/video-upload/{id}",
            delete(handlers::video_upload::delete_video),
        )
        .route("/image-upload", post(handlers::image_upload::upload_image))
        .route("/suggest", post(handlers::suggest::suggest))
}

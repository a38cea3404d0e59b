//! Handlers for `/api/video-upload`.
//!
//! Upload pushes the file to the media service first and only records a row
//! once the service has accepted it. Delete removes the remote asset first
//! and the row second.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use vidsqueeze_cloud::media::{ResourceType, UploadFile, UploadOptions};
use vidsqueeze_core::sizes::normalize_submitted_size;
use vidsqueeze_core::video::VideoRecord;
use vidsqueeze_db::models::video::CreateVideo;
use vidsqueeze_db::repositories::VideoRepo;

use super::{multipart_error, read_text};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

const UPLOAD_FAILED: &str = "Upload video failed";
const DELETE_FAILED: &str = "Failed to delete video";
const ID_REQUIRED: &str = "Video ID is required";

/// Fields of the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadFile>,
    title: Option<String>,
    description: Option<String>,
    original_size: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.file = Some(UploadFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "title" => form.title = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "originalSize" => form.original_size = Some(read_text(field).await?),
            _ => {} // ignore unknown fields
        }
    }
    Ok(form)
}

/// POST /api/video-upload
///
/// Multipart form with `file`, `title`, `description` and `originalSize`.
/// Responds with the created record in the same shape the list returns.
pub async fn upload_video(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<VideoRecord>> {
    let media = state.media()?;

    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file provided".into()))?;
    let upload_bytes = file.bytes.len();

    let asset = media
        .upload(file, &UploadOptions::video())
        .await
        .map_err(|e| AppError::Upstream {
            message: UPLOAD_FAILED.into(),
            detail: e.to_string(),
        })?;

    let input = CreateVideo {
        title: form.title.unwrap_or_default(),
        description: form.description,
        public_id: asset.public_id.clone(),
        original_size: normalize_submitted_size(form.original_size.as_deref()),
        compressed_size: asset.bytes.to_string(),
        duration: asset.duration.unwrap_or(0.0),
    };

    let video = VideoRepo::create(&state.pool, &input).await.map_err(|e| {
        tracing::error!(
            public_id = %asset.public_id,
            error = %e,
            "Failed to record uploaded video; remote asset is orphaned"
        );
        AppError::Database(e)
    })?;

    tracing::info!(
        video_id = %video.id,
        public_id = %video.public_id,
        user_id = %user.user_id,
        upload_bytes,
        stored_bytes = asset.bytes,
        "Video uploaded"
    );

    Ok(Json(video.into_record()))
}

/// DELETE /api/video-upload/{id}
///
/// Unknown ids (including ones that are not UUIDs) are a soft success. A
/// destroy result other than deleted / not found is logged and the row is
/// removed anyway; a failed destroy call leaves the row in place.
pub async fn delete_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let raw_id = raw_id.trim();
    if raw_id.is_empty() {
        return Err(AppError::BadRequest(ID_REQUIRED.into()));
    }

    let Ok(id) = raw_id.parse::<uuid::Uuid>() else {
        tracing::debug!(video_id = %raw_id, "Delete requested for a malformed id");
        return Ok(Json(MessageResponse::new("Video not found")));
    };

    let Some(video) = VideoRepo::find_by_id(&state.pool, id).await? else {
        return Ok(Json(MessageResponse::new("Video not found")));
    };

    let media = state.media()?;
    let outcome = media
        .destroy(&video.public_id, ResourceType::Video)
        .await
        .map_err(|e| AppError::Upstream {
            message: DELETE_FAILED.into(),
            detail: e.to_string(),
        })?;

    if !outcome.is_gone() {
        tracing::warn!(
            video_id = %id,
            public_id = %video.public_id,
            outcome = ?outcome,
            "Remote asset deletion reported an unexpected result; removing row anyway"
        );
    }

    VideoRepo::delete(&state.pool, id).await?;

    tracing::info!(video_id = %id, user_id = %user.user_id, "Video deleted");
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}

/// DELETE /api/video-upload
///
/// The id segment is missing entirely.
pub async fn delete_without_id(_user: AuthUser) -> AppResult<Json<MessageResponse>> {
    Err(AppError::BadRequest(ID_REQUIRED.into()))
}

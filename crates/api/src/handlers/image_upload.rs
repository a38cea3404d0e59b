//! Image upload for the social-share tool.
//!
//! Nothing is persisted: the client only needs the public id to build
//! cropped delivery URLs.

use axum::extract::{Multipart, State};
use axum::Json;
use image::ImageFormat;
use serde::Serialize;
use vidsqueeze_cloud::media::{UploadFile, UploadOptions};

use super::multipart_error;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Formats the share tool can crop.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub public_id: String,
}

/// Sniff the image format from the file's magic bytes.
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .filter(|f| ACCEPTED_FORMATS.contains(f))
}

/// POST /api/image-upload
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImageUploadResponse>> {
    let media = state.media()?;

    let mut file: Option<UploadFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if !bytes.is_empty() {
            file = Some(UploadFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file provided".into()))?;
    let format = detect_image_format(&file.bytes).ok_or_else(|| {
        AppError::BadRequest("Unsupported image format. Supported: PNG, JPEG, WebP, GIF".into())
    })?;

    let asset = media
        .upload(file, &UploadOptions::image())
        .await
        .map_err(|e| AppError::Upstream {
            message: "Upload image failed".into(),
            detail: e.to_string(),
        })?;

    tracing::info!(
        public_id = %asset.public_id,
        user_id = %user.user_id,
        format = ?format,
        "Image uploaded"
    );

    Ok(Json(ImageUploadResponse {
        public_id: asset.public_id,
    }))
}

pub mod image_upload;
pub mod suggest;
pub mod video_upload;
pub mod videos;

use axum::extract::multipart::{Field, MultipartError};

use crate::error::AppError;

fn multipart_error(e: MultipartError) -> AppError {
    AppError::BadRequest(e.body_text())
}

/// Read a text field of a multipart form.
async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}

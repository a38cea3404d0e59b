//! Video row model and insert DTO.

use serde::Serialize;
use sqlx::FromRow;
use vidsqueeze_core::sizes::parse_stored_size;
use vidsqueeze_core::types::{Timestamp, VideoId};
use vidsqueeze_core::video::VideoRecord;

/// A row from the `videos` table.
///
/// Sizes are kept as the decimal strings that were stored; use
/// [`Video::into_record`] to get the normalized shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: String,
    pub compressed_size: String,
    pub duration: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Convert to the normalized record: sizes parsed to numbers, blank
    /// sizes as `0`, unparseable sizes as `None`.
    pub fn into_record(self) -> VideoRecord {
        VideoRecord {
            original_size: parse_stored_size(Some(&self.original_size)),
            compressed_size: parse_stored_size(Some(&self.compressed_size)),
            id: self.id,
            title: self.title,
            description: self.description,
            public_id: self.public_id,
            duration: self.duration,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DTO for inserting a video after the media service accepted the upload.
#[derive(Debug, Clone)]
pub struct CreateVideo {
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: String,
    pub compressed_size: String,
    pub duration: f64,
}

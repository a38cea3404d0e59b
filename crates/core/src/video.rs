//! Normalized video record exchanged between the API and its clients.

use serde::{Deserialize, Serialize};

use crate::sizes::compression_percentage;
use crate::types::{Timestamp, VideoId};

/// A video as returned by the list and upload endpoints.
///
/// Sizes are numbers (stored as strings, parsed at read time). A size that
/// could not be parsed is `None` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub description: Option<String>,
    pub public_id: String,
    pub original_size: Option<f64>,
    pub compressed_size: Option<f64>,
    pub duration: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VideoRecord {
    /// Percentage saved by compression, or `None` when it is undefined.
    pub fn compression_percentage(&self) -> Option<i64> {
        compression_percentage(
            self.original_size.unwrap_or(f64::NAN),
            self.compressed_size.unwrap_or(f64::NAN),
        )
    }
}

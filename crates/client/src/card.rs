//! One tile of the dashboard grid.

use vidsqueeze_cloud::delivery::DeliveryUrls;
use vidsqueeze_core::format::{format_duration, format_size, relative_time, NOT_AVAILABLE};
use vidsqueeze_core::types::{Timestamp, VideoId};
use vidsqueeze_core::video::VideoRecord;

use crate::preview::{PreviewState, ShownMedia};

/// A video record plus everything its card renders.
#[derive(Debug, Clone)]
pub struct VideoCard {
    pub record: VideoRecord,
    pub thumbnail_url: String,
    pub preview_url: String,
    pub video_url: String,
    preview: PreviewState,
}

impl VideoCard {
    pub fn new(record: VideoRecord, urls: &DeliveryUrls) -> Self {
        Self {
            thumbnail_url: urls.thumbnail_url(&record.public_id),
            preview_url: urls.preview_url(&record.public_id),
            video_url: urls.video_url(&record.public_id),
            record,
            preview: PreviewState::Idle,
        }
    }

    pub fn id(&self) -> VideoId {
        self.record.id
    }

    /// `"Uploaded 2 days ago"` style suffix, relative to `now`.
    pub fn uploaded_ago(&self, now: Timestamp) -> String {
        relative_time(self.record.created_at, now)
    }

    pub fn original_size_label(&self) -> String {
        format_size(self.record.original_size)
    }

    pub fn compressed_size_label(&self) -> String {
        format_size(self.record.compressed_size)
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.record.duration)
    }

    /// `"70%"`, or `"N/A"` when the saving is undefined.
    pub fn compression_label(&self) -> String {
        match self.record.compression_percentage() {
            Some(pct) => format!("{pct}%"),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    // ---- hover preview ----

    pub fn preview_state(&self) -> PreviewState {
        self.preview
    }

    pub fn mouse_enter(&mut self) {
        self.preview = self.preview.mouse_enter();
    }

    pub fn mouse_leave(&mut self) {
        self.preview = self.preview.mouse_leave();
    }

    pub fn preview_error(&mut self) {
        self.preview = self.preview.preview_error();
    }

    pub fn shown_media(&self) -> ShownMedia<'_> {
        self.preview.shown(&self.thumbnail_url, &self.preview_url)
    }

    /// Name to save the downloaded video under: `"{title}.mp4"`.
    pub fn download_file_name(&self) -> String {
        download_file_name(&self.record.title)
    }
}

/// Path separators and control characters become `_`; an empty title falls
/// back to `video`.
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if stem.is_empty() {
        "video.mp4".to_string()
    } else {
        format!("{stem}.mp4")
    }
}

//! The dashboard grid: list, download and delete.

use vidsqueeze_cloud::delivery::DeliveryUrls;
use vidsqueeze_core::types::VideoId;

use crate::api::{ApiClient, ClientError};
use crate::card::VideoCard;
use crate::notice::Notice;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this video?";

/// Load state of the grid.
#[derive(Debug, Clone)]
pub enum DashboardState {
    Loading,
    Ready(Vec<VideoCard>),
    Failed(String),
}

/// A downloaded video, ready to be saved.
#[derive(Debug, Clone)]
pub struct DownloadedVideo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct Dashboard {
    api: ApiClient,
    urls: DeliveryUrls,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(api: ApiClient, urls: DeliveryUrls) -> Self {
        Self {
            api,
            urls,
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Cards currently shown; empty unless the list has loaded.
    pub fn cards(&self) -> &[VideoCard] {
        match &self.state {
            DashboardState::Ready(cards) => cards,
            _ => &[],
        }
    }

    pub fn card_mut(&mut self, id: VideoId) -> Option<&mut VideoCard> {
        match &mut self.state {
            DashboardState::Ready(cards) => cards.iter_mut().find(|c| c.id() == id),
            _ => None,
        }
    }

    /// Fetch the list. The state is `Loading` until the call resolves.
    pub async fn load(&mut self) {
        self.state = DashboardState::Loading;

        self.state = match self.api.list_videos().await {
            Ok(records) => DashboardState::Ready(
                records
                    .into_iter()
                    .map(|r| VideoCard::new(r, &self.urls))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch videos");
                DashboardState::Failed(match e {
                    ClientError::UnexpectedFormat => e.to_string(),
                    _ => "Failed to fetch videos".to_string(),
                })
            }
        };
    }

    /// Delete a video after `confirm` agrees.
    ///
    /// Returns `None` when the user cancels (or the card is unknown). The
    /// card leaves the grid only after the server answers 200.
    pub async fn delete<F>(&mut self, id: VideoId, confirm: F) -> Option<Notice>
    where
        F: FnOnce(&str) -> bool,
    {
        if !self.cards().iter().any(|c| c.id() == id) || !confirm(DELETE_CONFIRMATION) {
            return None;
        }

        match self.api.delete_video(id).await {
            Ok(_) => {
                if let DashboardState::Ready(cards) = &mut self.state {
                    cards.retain(|c| c.id() != id);
                }
                Some(Notice::success("Video deleted successfully"))
            }
            Err(e) => {
                tracing::warn!(video_id = %id, error = %e, "Error deleting video");
                Some(Notice::error(match e.server_message() {
                    Some(message) if !message.is_empty() => message.to_string(),
                    _ if matches!(e, ClientError::Request(_)) => {
                        "An unexpected error occurred while deleting the video.".to_string()
                    }
                    _ => "Failed to delete video".to_string(),
                }))
            }
        }
    }

    /// Fetch a card's full video from the CDN.
    pub async fn download(&self, id: VideoId) -> Result<DownloadedVideo, Notice> {
        let card = self
            .cards()
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| Notice::error("Video not found"))?;

        let bytes = self.api.download(&card.video_url).await.map_err(|e| {
            tracing::warn!(video_id = %id, error = %e, "Download failed");
            Notice::error("Failed to download video")
        })?;

        Ok(DownloadedVideo {
            file_name: card.download_file_name(),
            bytes,
        })
    }
}

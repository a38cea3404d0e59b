//! Delivery-URL builders for stored assets.
//!
//! All URLs point at the media CDN directly; the server never proxies asset
//! bytes.

use vidsqueeze_core::social::SocialFormat;

/// Default CDN origin.
pub const DEFAULT_DELIVERY_BASE_URL: &str = "https://res.cloudinary.com";

/// Card thumbnail / preview width.
pub const CARD_WIDTH: u32 = 400;
/// Card thumbnail / preview height.
pub const CARD_HEIGHT: u32 = 225;

/// Short multi-segment preview reel shown while hovering a card.
const PREVIEW_EFFECT: &str = "e_preview:duration_15:max_seg_9:min_seg_dur_1";

/// Builds delivery URLs for one cloud.
#[derive(Debug, Clone)]
pub struct DeliveryUrls {
    base_url: String,
    cloud_name: String,
}

impl DeliveryUrls {
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_DELIVERY_BASE_URL, cloud_name)
    }

    /// Use a different CDN origin (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cloud_name: cloud_name.into(),
        }
    }

    fn video_root(&self) -> String {
        format!("{}/{}/video/upload", self.base_url, self.cloud_name)
    }

    /// Still frame of a video, cropped to fill the card.
    pub fn thumbnail_url(&self, public_id: &str) -> String {
        format!(
            "{}/c_fill,g_auto,h_{CARD_HEIGHT},w_{CARD_WIDTH}/q_auto/{public_id}.jpg",
            self.video_root()
        )
    }

    /// Short preview reel for hover playback.
    pub fn preview_url(&self, public_id: &str) -> String {
        format!(
            "{}/{PREVIEW_EFFECT}/c_limit,h_{CARD_HEIGHT},w_{CARD_WIDTH}/q_auto/{public_id}.mp4",
            self.video_root()
        )
    }

    /// Full compressed video, as stored.
    pub fn video_url(&self, public_id: &str) -> String {
        format!("{}/q_auto/{public_id}.mp4", self.video_root())
    }

    /// Image cropped to a social format, subject kept in frame.
    pub fn social_image_url(&self, public_id: &str, format: &SocialFormat) -> String {
        format!(
            "{}/{}/image/upload/c_fill,ar_{},g_auto,h_{},w_{}/{public_id}",
            self.base_url, self.cloud_name, format.aspect_ratio, format.height, format.width
        )
    }
}

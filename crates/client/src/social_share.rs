//! Social-share tool: upload an image once, crop it for each network.

use vidsqueeze_cloud::delivery::DeliveryUrls;
use vidsqueeze_core::social::{SocialFormat, SOCIAL_FORMATS};

use crate::api::ApiClient;
use crate::notice::Notice;

/// A transformed image, ready to be saved.
#[derive(Debug, Clone)]
pub struct SharedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct SocialShare {
    urls: DeliveryUrls,
    selected: &'static SocialFormat,
    uploaded_public_id: Option<String>,
}

impl SocialShare {
    pub fn new(urls: DeliveryUrls) -> Self {
        Self {
            urls,
            selected: SocialFormat::default_format(),
            uploaded_public_id: None,
        }
    }

    pub fn formats() -> &'static [SocialFormat] {
        SOCIAL_FORMATS
    }

    pub fn selected(&self) -> &'static SocialFormat {
        self.selected
    }

    /// Select a format by label. Unknown labels leave the selection as is.
    pub fn select(&mut self, label: &str) -> bool {
        match SocialFormat::by_label(label) {
            Some(format) => {
                self.selected = format;
                true
            }
            None => false,
        }
    }

    pub fn uploaded_public_id(&self) -> Option<&str> {
        self.uploaded_public_id.as_deref()
    }

    /// Upload the source image. A failure keeps any previous image.
    pub async fn upload(
        &mut self,
        api: &ApiClient,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), Notice> {
        let public_id = api.upload_image(file_name, bytes).await.map_err(|e| {
            tracing::warn!(error = %e, "Error uploading image");
            Notice::error("Failed to upload image. Please try again.")
        })?;
        self.uploaded_public_id = Some(public_id);
        Ok(())
    }

    /// Delivery URL of the uploaded image cropped to the selected format.
    pub fn transformed_url(&self) -> Option<String> {
        self.uploaded_public_id
            .as_deref()
            .map(|id| self.urls.social_image_url(id, self.selected))
    }

    pub fn download_file_name(&self) -> String {
        self.selected.download_file_name()
    }

    /// Fetch the transformed image. `None` when nothing is uploaded yet.
    pub async fn download(&self, api: &ApiClient) -> Option<Result<SharedImage, Notice>> {
        let url = self.transformed_url()?;
        Some(
            api.download(&url)
                .await
                .map(|bytes| SharedImage {
                    file_name: self.download_file_name(),
                    bytes,
                })
                .map_err(|e| {
                    tracing::warn!(error = %e, "Failed to download image");
                    Notice::error("Failed to download image")
                }),
        )
    }
}

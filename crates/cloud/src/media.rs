//! Media service capability.
//!
//! The server only ever needs two operations from the media service: push
//! bytes and get back an asset descriptor, and destroy an asset by its
//! public id. Any provider can sit behind [`MediaProvider`].

use std::time::Duration;

use async_trait::async_trait;

/// Folder that video uploads are stored under.
pub const VIDEO_FOLDER: &str = "video-uploads";

/// Folder that image uploads are stored under.
pub const IMAGE_FOLDER: &str = "image-uploads";

/// Upper bound on a single upload call.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Kind of asset stored remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Video,
    Image,
}

impl ResourceType {
    /// Path segment / API value.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Video => "video",
            ResourceType::Image => "image",
        }
    }
}

/// Normalization the media service applies while ingesting an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingTransformation {
    /// Quality setting, e.g. `auto`.
    pub quality: String,
    /// Output container/format, e.g. `mp4`.
    pub format: String,
}

/// Options for one upload call.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub resource_type: ResourceType,
    pub folder: String,
    pub timeout: Duration,
    pub transformation: Option<IncomingTransformation>,
}

impl UploadOptions {
    /// Video upload: `video-uploads` folder, 120 s timeout, automatic
    /// quality, normalized to mp4.
    pub fn video() -> Self {
        Self {
            resource_type: ResourceType::Video,
            folder: VIDEO_FOLDER.to_string(),
            timeout: UPLOAD_TIMEOUT,
            transformation: Some(IncomingTransformation {
                quality: "auto".to_string(),
                format: "mp4".to_string(),
            }),
        }
    }

    /// Image upload: `image-uploads` folder, stored as-is.
    pub fn image() -> Self {
        Self {
            resource_type: ResourceType::Image,
            folder: IMAGE_FOLDER.to_string(),
            timeout: UPLOAD_TIMEOUT,
            transformation: None,
        }
    }
}

/// The bytes of one uploaded file plus what the client said about it.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Descriptor the media service returns for a stored asset.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAsset {
    /// Key for every later operation on the asset.
    pub public_id: String,
    /// Stored (post-processing) size in bytes.
    pub bytes: u64,
    /// Duration in seconds; `None` for assets without one (e.g. images).
    pub duration: Option<f64>,
}

/// What the media service reported for a destroy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// The asset existed and was removed.
    Deleted,
    /// The asset did not exist.
    NotFound,
    /// Any other reported result, kept verbatim for logging.
    Other(String),
}

impl DestroyOutcome {
    /// Whether the outcome means the remote asset is gone.
    pub fn is_gone(&self) -> bool {
        matches!(self, DestroyOutcome::Deleted | DestroyOutcome::NotFound)
    }
}

/// Errors from a media service call.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The call did not complete within the configured timeout.
    #[error("Media service request timed out")]
    Timeout,

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("Media service request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Media service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 2xx with a body we could not use.
    #[error("Unexpected media service response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Upload/destroy capability of an external media service.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Upload a file and return the stored asset's descriptor.
    async fn upload(
        &self,
        file: UploadFile,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, MediaError>;

    /// Destroy an asset by public id.
    async fn destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DestroyOutcome, MediaError>;
}

//! Typed HTTP client for the dashboard API.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use vidsqueeze_core::types::VideoId;
use vidsqueeze_core::video::VideoRecord;

/// Errors returned by [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `error` field when present.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered 503; the caller may retry later.
    #[error("{message}")]
    Overloaded {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Unexpected response format")]
    UnexpectedFormat,
}

impl ClientError {
    /// Server-provided message, if the failure came with one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } | ClientError::Overloaded { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct SuggestBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuggestReply {
    completion: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageUploadReply {
    public_id: String,
}

/// A video ready to be posted to the upload endpoint.
#[derive(Debug, Clone)]
pub struct VideoSubmission {
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the dashboard API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    /// Send the given session token as a bearer credential on API calls.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// `GET /api/videos`. Anything other than a JSON array is rejected.
    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, ClientError> {
        let response = self.request(reqwest::Method::GET, "/api/videos").send().await?;
        let response = Self::ensure_success(response).await?;
        let body: serde_json::Value = response.json().await?;

        if !body.is_array() {
            return Err(ClientError::UnexpectedFormat);
        }
        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "Video list did not match the record shape");
            ClientError::UnexpectedFormat
        })
    }

    /// `POST /api/video-upload`. `originalSize` is the byte length of the file.
    pub async fn upload_video(&self, video: &VideoSubmission) -> Result<VideoRecord, ClientError> {
        let mut part = Part::bytes(video.bytes.clone()).file_name(video.file_name.clone());
        if let Some(content_type) = video.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("title", video.title.clone())
            .text("description", video.description.clone())
            .text("originalSize", video.bytes.len().to_string());

        let response = self
            .request(reqwest::Method::POST, "/api/video-upload")
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /api/video-upload/{id}`. Returns the server's message.
    pub async fn delete_video(&self, id: VideoId) -> Result<String, ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/video-upload/{id}"))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body: MessageBody = response.json().await?;
        Ok(body.message)
    }

    /// `POST /api/suggest`. Returns the raw completion.
    pub async fn suggest(&self, prompt: &str) -> Result<String, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/suggest")
            .json(&SuggestBody { prompt })
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body: SuggestReply = response.json().await?;
        Ok(body.completion)
    }

    /// `POST /api/image-upload`. Returns the stored image's public id.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self
            .request(reqwest::Method::POST, "/api/image-upload")
            .multipart(form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body: ImageUploadReply = response.json().await?;
        Ok(body.public_id)
    }

    /// Fetch an asset's bytes from an absolute delivery URL.
    ///
    /// Delivery URLs point at the CDN, so no session credential is sent.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match &self.session_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-2xx response into a [`ClientError`], preferring the
    /// server's `{error}` message over the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::Overloaded {
                message,
                retry_after_secs,
            });
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

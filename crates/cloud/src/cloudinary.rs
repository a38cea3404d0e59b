//! Cloudinary implementation of [`MediaProvider`].
//!
//! Uses the signed REST upload API (`/v1_1/{cloud}/{resource}/upload` and
//! `/destroy`). Signatures are the hex digest of the alphabetically sorted
//! `key=value` pairs joined with `&`, followed by the API secret. The digest
//! is SHA-1 unless the account is switched to SHA-256.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::media::{
    DestroyOutcome, IncomingTransformation, MediaError, MediaProvider, ResourceType, UploadFile,
    UploadOptions, UploadedAsset,
};

/// Default REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com";

/// Credentials and endpoint for one Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// REST base URL (overridable for tests and proxies).
    pub api_base_url: String,
    /// Must match the account's signature setting.
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest used for request signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// Cloudinary's default for new accounts.
    #[default]
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            other => Err(format!("unknown signature algorithm '{other}'")),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignatureAlgorithm::Sha1 => "sha1",
            SignatureAlgorithm::Sha256 => "sha256",
        })
    }
}

impl CloudinaryConfig {
    /// Load credentials from the environment.
    ///
    /// | Env Var                                   | Required |
    /// |-------------------------------------------|----------|
    /// | `CLOUDINARY_CLOUD_NAME` (or `NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME`) | yes |
    /// | `CLOUDINARY_API_KEY`                      | yes      |
    /// | `CLOUDINARY_API_SECRET`                   | yes      |
    /// | `CLOUDINARY_API_BASE_URL`                 | no       |
    /// | `CLOUDINARY_SIGNATURE_ALGORITHM` (`sha1` or `sha256`, default `sha1`) | no |
    ///
    /// Returns `None` if any required value is missing or empty; uploads
    /// then fail with a configuration error instead of at startup. An
    /// unrecognized signature algorithm is logged and SHA-1 is used.
    pub fn from_env() -> Option<Self> {
        let cloud_name = non_empty_env("CLOUDINARY_CLOUD_NAME")
            .or_else(|| non_empty_env("NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME"))?;
        let api_key = non_empty_env("CLOUDINARY_API_KEY")?;
        let api_secret = non_empty_env("CLOUDINARY_API_SECRET")?;
        let api_base_url = non_empty_env("CLOUDINARY_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let signature_algorithm = non_empty_env("CLOUDINARY_SIGNATURE_ALGORITHM")
            .map(|raw| {
                raw.parse().unwrap_or_else(|e: String| {
                    tracing::warn!(error = %e, "Falling back to SHA-1 request signatures");
                    SignatureAlgorithm::Sha1
                })
            })
            .unwrap_or_default();

        Some(Self {
            cloud_name,
            api_key,
            api_secret,
            api_base_url,
            signature_algorithm,
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Sign a set of request parameters.
///
/// Parameters with empty values are skipped, matching the service's own
/// canonicalization.
pub fn sign_params(
    params: &BTreeMap<&str, String>,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let canonical = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    match algorithm {
        SignatureAlgorithm::Sha1 => hex_digest::<Sha1>(&canonical, api_secret),
        SignatureAlgorithm::Sha256 => hex_digest::<Sha256>(&canonical, api_secret),
    }
}

fn hex_digest<D: Digest>(canonical: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(canonical.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Render an incoming transformation in URL-parameter form (`f_mp4,q_auto`).
pub fn transformation_param(t: &IncomingTransformation) -> String {
    format!("f_{},q_{}", t.format, t.quality)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    bytes: u64,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Cloudinary REST API.
pub struct CloudinaryClient {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type.as_str(),
            action
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`MediaError::Api`], preferring the
    /// service's own error message over the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(MediaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn map_request_error(err: reqwest::Error) -> MediaError {
    if err.is_timeout() {
        MediaError::Timeout
    } else {
        MediaError::Request(err)
    }
}

#[async_trait]
impl MediaProvider for CloudinaryClient {
    async fn upload(
        &self,
        file: UploadFile,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", options.folder.clone());
        params.insert("timestamp", Self::timestamp());
        if let Some(t) = &options.transformation {
            params.insert("transformation", transformation_param(t));
        }
        let signature = sign_params(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        tracing::debug!(
            folder = %options.folder,
            resource_type = options.resource_type.as_str(),
            "Uploading asset to Cloudinary"
        );

        let response = self
            .client
            .post(self.endpoint(options.resource_type, "upload"))
            .timeout(options.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        let response = Self::ensure_success(response).await?;
        let body: UploadResponse = response.json().await.map_err(map_request_error)?;

        if body.public_id.is_empty() {
            return Err(MediaError::InvalidResponse(
                "upload response has an empty public_id".into(),
            ));
        }

        Ok(UploadedAsset {
            public_id: body.public_id,
            bytes: body.bytes,
            duration: body.duration,
        })
    }

    async fn destroy(
        &self,
        public_id: &str,
        resource_type: ResourceType,
    ) -> Result<DestroyOutcome, MediaError> {
        let timestamp = Self::timestamp();
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", timestamp.clone());
        let signature = sign_params(
            &params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let form = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
        ];

        let response = self
            .client
            .post(self.endpoint(resource_type, "destroy"))
            .form(&form)
            .send()
            .await
            .map_err(map_request_error)?;

        let response = Self::ensure_success(response).await?;
        let body: DestroyResponse = response.json().await.map_err(map_request_error)?;

        Ok(match body.result.as_str() {
            "ok" => DestroyOutcome::Deleted,
            "not found" => DestroyOutcome::NotFound,
            _ => DestroyOutcome::Other(body.result),
        })
    }
}

//! Gemini implementation of [`TextGenerator`].
//!
//! Calls `POST {base}/v1beta/models/{model}:generateContent` with the API key
//! in the `x-goog-api-key` header and concatenates the text parts of the
//! first candidate.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::genai::{GenAiError, TextGenerator};

/// Default REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Error statuses the service uses for a temporarily unavailable model.
const OVERLOAD_STATUSES: &[&str] = &["UNAVAILABLE", "RESOURCE_EXHAUSTED"];

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
}

impl GeminiConfig {
    /// Load configuration from the environment.
    ///
    /// | Env Var               | Required | Default            |
    /// |-----------------------|----------|--------------------|
    /// | `GEMINI_API_KEY`      | yes      | --                 |
    /// | `GEMINI_MODEL`        | no       | `gemini-1.5-flash` |
    /// | `GEMINI_API_BASE_URL` | no       | Google endpoint    |
    ///
    /// Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let model = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base_url = std::env::var("GEMINI_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Some(Self {
            api_key,
            model,
            api_base_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Map a non-2xx response to [`GenAiError::Overloaded`] or
    /// [`GenAiError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenAiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();

        let overloaded = status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::TOO_MANY_REQUESTS
            || envelope
                .as_ref()
                .is_some_and(|e| OVERLOAD_STATUSES.contains(&e.error.status.as_str()));
        if overloaded {
            return Err(GenAiError::Overloaded);
        }

        Err(GenAiError::Api {
            status: status.as_u16(),
            message: envelope.map(|e| e.error.message).unwrap_or(body),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        tracing::debug!(model = %self.config.model, "Requesting text generation");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(GenAiError::Empty)
    }
}

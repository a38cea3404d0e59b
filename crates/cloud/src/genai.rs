//! Text generation capability.

use async_trait::async_trait;

/// Errors from a text generation call.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The model is temporarily unavailable or rate-limited; the caller may
    /// retry later.
    #[error("Text generation service is overloaded")]
    Overloaded,

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("Text generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status that is not an overload.
    #[error("Text generation error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered but produced no text.
    #[error("Text generation returned no content")]
    Empty,
}

impl GenAiError {
    pub fn is_overloaded(&self) -> bool {
        matches!(self, GenAiError::Overloaded)
    }
}

/// Single-shot prompt completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`. No retries are attempted.
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError>;
}

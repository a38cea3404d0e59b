//! Video upload form with the AI description helper.

use std::sync::LazyLock;

use regex::Regex;
use vidsqueeze_core::video::VideoRecord;

use crate::api::{ApiClient, ClientError, VideoSubmission};
use crate::notice::Notice;

/// Largest file the form will submit (263 MiB).
pub const MAX_FILE_BYTES: u64 = 263 * 1024 * 1024;

const SUGGESTION_INSTRUCTION: &str = "Generate a single, short and meaning description under 150 characters. Dont provide multiple options or explanations, brackets(), ** stars and symbols";

static WRAPPING_QUOTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"|"$"#).expect("valid regex"));

/// Validation failures caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("No file selected")]
    FileRequired,
    #[error("File size is too large")]
    FileTooLarge { size: u64, limit: u64 },
}

/// A file picked by the user.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub file: Option<SelectedFile>,
    suggestion: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// The suggestion button is enabled only once a title is entered.
    pub fn can_suggest(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn validate(&self) -> Result<&SelectedFile, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        if self.description.trim().is_empty() {
            return Err(FormError::DescriptionRequired);
        }
        let file = self.file.as_ref().ok_or(FormError::FileRequired)?;
        if file.len() > MAX_FILE_BYTES {
            return Err(FormError::FileTooLarge {
                size: file.len(),
                limit: MAX_FILE_BYTES,
            });
        }
        Ok(file)
    }

    /// Build the multipart payload. `originalSize` is taken from the file.
    pub fn to_submission(&self) -> Result<VideoSubmission, FormError> {
        let file = self.validate()?;
        Ok(VideoSubmission {
            title: self.title.clone(),
            description: self.description.clone(),
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        })
    }

    /// Validate and upload. Nothing is sent when validation fails.
    pub async fn submit(&self, api: &ApiClient) -> Result<VideoRecord, Notice> {
        let submission = self
            .to_submission()
            .map_err(|e| Notice::error(e.to_string()))?;

        api.upload_video(&submission).await.map_err(|e| {
            tracing::warn!(error = %e, "Video upload failed");
            Notice::error("Failed to upload video")
        })
    }

    /// Clear every field, including the file and any pending suggestion.
    pub fn reset(&mut self) -> Notice {
        *self = Self::default();
        Notice::success("reloaded successfully")
    }

    /// Ask the text generator for a description of the current title.
    ///
    /// Does nothing without a title. Any previous suggestion is discarded
    /// before the call.
    pub async fn request_suggestion(&mut self, api: &ApiClient) -> Result<(), Notice> {
        if !self.can_suggest() {
            return Ok(());
        }
        self.suggestion = None;

        let completion = api
            .suggest(&suggestion_prompt(&self.title))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to get suggestion");
                match &e {
                    ClientError::Api { message, .. } | ClientError::Overloaded { message, .. }
                        if !message.is_empty() =>
                    {
                        Notice::error(message.clone())
                    }
                    ClientError::Api { .. } | ClientError::Overloaded { .. } => {
                        Notice::error("Could not get a suggestion at this time")
                    }
                    _ => Notice::error(
                        "An unexpected error occurred while getting a suggestion.",
                    ),
                }
            })?;

        let cleaned = clean_suggestion(&completion);
        if cleaned.is_empty() {
            return Err(Notice::error("Could not get suggestion"));
        }
        self.suggestion = Some(cleaned);
        Ok(())
    }

    /// Append the pending suggestion to the description (blank line between).
    pub fn use_suggestion(&mut self) {
        let Some(suggestion) = self.suggestion.as_deref() else {
            return;
        };
        if self.description.is_empty() {
            self.description = suggestion.to_string();
        } else {
            self.description = format!("{}\n\n{suggestion}", self.description);
        }
    }
}

/// The fixed instruction followed by the quoted title.
pub fn suggestion_prompt(title: &str) -> String {
    format!("{SUGGESTION_INSTRUCTION}\"{title}\"")
}

/// Strip one leading and one trailing double quote, ignoring surrounding
/// whitespace (completions usually end in a newline).
pub fn clean_suggestion(raw: &str) -> String {
    WRAPPING_QUOTES_RE
        .replace_all(raw.trim(), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn filled() -> UploadForm {
        UploadForm {
            title: "Beach".into(),
            description: "Waves".into(),
            file: Some(SelectedFile {
                name: "beach.mov".into(),
                content_type: Some("video/quicktime".into()),
                bytes: vec![0; 1024],
            }),
            suggestion: None,
        }
    }

    #[test]
    fn prompt_wraps_title_in_quotes() {
        let prompt = suggestion_prompt("Beach");
        assert!(prompt.starts_with("Generate a single, short and meaning description"));
        assert!(prompt.ends_with("stars and symbols\"Beach\""));
    }

    #[test]
    fn cleaning_strips_one_quote_pair() {
        assert_eq!(clean_suggestion("\"Waves at dusk.\""), "Waves at dusk.");
        assert_eq!(clean_suggestion("  plain  "), "plain");
        assert_eq!(clean_suggestion("\"x\"\n"), "x");
        assert_eq!(clean_suggestion("\n \"Waves at dusk.\" \n"), "Waves at dusk.");
        assert_eq!(clean_suggestion("\"\"double\"\""), "\"double\"");
        assert_eq!(clean_suggestion("say \"hi\" now"), "say \"hi\" now");
    }

    #[test]
    fn submission_uses_file_length() {
        let submission = filled().to_submission().unwrap();
        assert_eq!(submission.bytes.len(), 1024);
        assert_eq!(submission.file_name, "beach.mov");
    }

    #[test]
    fn validation_order() {
        let mut form = filled();
        form.title = " ".into();
        assert_eq!(form.validate().unwrap_err(), FormError::TitleRequired);

        let mut form = filled();
        form.description.clear();
        assert_eq!(form.validate().unwrap_err(), FormError::DescriptionRequired);

        let mut form = filled();
        form.file = None;
        assert_eq!(form.validate().unwrap_err(), FormError::FileRequired);
    }

    #[test]
    fn oversize_file_is_rejected() {
        let mut form = filled();
        form.file = Some(SelectedFile {
            name: "big.mp4".into(),
            content_type: None,
            bytes: vec![0; (MAX_FILE_BYTES + 1) as usize],
        });
        assert_matches!(
            form.validate(),
            Err(FormError::FileTooLarge { limit: MAX_FILE_BYTES, .. })
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = filled();
        form.suggestion = Some("x".into());
        let notice = form.reset();
        assert!(!notice.is_error());
        assert!(form.title.is_empty() && form.description.is_empty());
        assert!(form.file.is_none() && form.suggestion().is_none());
    }

    #[test]
    fn using_a_suggestion_appends() {
        let mut form = filled();
        form.suggestion = Some("Golden light.".into());
        form.use_suggestion();
        assert_eq!(form.description, "Waves\n\nGolden light.");

        let mut form = UploadForm::new();
        form.suggestion = Some("Golden light.".into());
        form.use_suggestion();
        assert_eq!(form.description, "Golden light.");
    }
}

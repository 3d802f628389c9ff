//! AI coach - exercise suggestions, chat, grounded search and form feedback
//!
//! Every call goes to the Gemini REST API. Failures never escape to the UI:
//! callers turn them into the fallback texts below.

mod chat;
mod gemini;
mod media;
mod prompts;

pub use chat::{ChatLog, ChatMessage, ChatSession, Role};
pub use gemini::{Content, GeminiClient, GenerateRequest, GenerateResponse, InlineData, Part};
pub use media::resolve_media_url;
pub use prompts::{QUICK_PROMPTS, QuickPrompt, PromptTopic, format_prompt};

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub const SUGGEST_ERROR: &str = "Sorry, I couldn't get any suggestions right now. Please try again.";
pub const CHAT_FALLBACK: &str = "Sorry, I'm having trouble connecting. Please try again.";
pub const SEARCH_FALLBACK: &str = "Sorry, I couldn't perform the search. Please try again.";
pub const FEEDBACK_FALLBACK: &str = "Sorry, I couldn't analyze the image right now. Please try again.";

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Please enter a Workout Focus first to get suggestions.")]
    MissingFocus,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response contained no text")]
    EmptyResponse,
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not read image: {0}")]
    Image(#[from] std::io::Error),
}

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct CoachSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Web citation of a grounded answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub title: Option<String>,
    pub uri: String,
}

impl Source {
    /// Title when present, otherwise the URI
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub text: String,
    pub sources: Vec<Source>,
}

impl SearchResult {
    pub fn fallback() -> Self {
        Self {
            text: SEARCH_FALLBACK.to_string(),
            sources: Vec::new(),
        }
    }
}

/// Image sent inline with a feedback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, CoachError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }
}

/// MIME type from the file extension, JPEG when unknown
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Chat reply, or the apology appended to the log instead
pub fn reply_or_fallback(result: Result<String, CoachError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Error sending message: {}", e);
        CHAT_FALLBACK.to_string()
    })
}

pub fn search_or_fallback(result: Result<SearchResult, CoachError>) -> SearchResult {
    result.unwrap_or_else(|e| {
        warn!("Error during web search: {}", e);
        SearchResult::fallback()
    })
}

pub fn feedback_or_fallback(result: Result<String, CoachError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Error getting form feedback: {}", e);
        FEEDBACK_FALLBACK.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_replace_errors() {
        assert_eq!(reply_or_fallback(Err(CoachError::EmptyResponse)), CHAT_FALLBACK);
        assert_eq!(reply_or_fallback(Ok("Hi".into())), "Hi");
        assert_eq!(
            search_or_fallback(Err(CoachError::MissingApiKey)),
            SearchResult::fallback()
        );
        assert_eq!(feedback_or_fallback(Err(CoachError::EmptyResponse)), FEEDBACK_FALLBACK);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("squat.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("squat.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("squat")), "image/jpeg");
    }

    #[test]
    fn test_image_payload_is_base64() {
        let payload = ImagePayload::from_bytes(b"hello", "image/png");
        assert_eq!(payload.data, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_image_payload_from_missing_file() {
        let err = ImagePayload::from_path(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Image(_)));
    }

    #[test]
    fn test_source_label_falls_back_to_uri() {
        let source = Source { title: None, uri: "https://x.example".into() };
        assert_eq!(source.label(), "https://x.example");
    }
}

//! Gemini REST client - generateContent and its wire types

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{CoachError, CoachSettings, ImagePayload, SearchResult, Source};

const SUGGEST_PROMPT: &str = "Suggest 5 popular and effective exercises for a \"{focus}\" workout. \
     Provide the response as a simple JSON array of strings.";

const FEEDBACK_PROMPT: &str = "As an expert fitness coach, analyze the user's form for the \"{exercise}\" \
     exercise in this image. Provide specific, constructive feedback on their posture, alignment, \
     and execution. Point out any potential mistakes and suggest 2-3 actionable corrections to \
     ensure safety and effectiveness. Format the feedback in a short, easy-to-read list. \
     Start with an encouraging sentence.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".into()),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".into()),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(|p| p.text.as_deref()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate
    pub fn text(&self) -> Result<String, CoachError> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(Content::text)
            .filter(|t| !t.is_empty())
            .ok_or(CoachError::EmptyResponse)
    }

    /// Web citations of the first candidate
    pub fn sources(&self) -> Vec<Source> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        let uri = web.uri.clone()?;
                        Some(Source {
                            title: web.title.clone().filter(|t| !t.is_empty()),
                            uri,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Client for the generateContent endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: CoachSettings,
}

impl GeminiClient {
    pub fn new(settings: CoachSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, CoachError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(CoachError::MissingApiKey)?;

        debug!(model = %self.settings.model, contents = request.contents.len(), "generateContent");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoachError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    /// Exercise names for a workout focus
    pub async fn suggest_exercises(&self, focus: &str) -> Result<Vec<String>, CoachError> {
        let focus = focus.trim();
        if focus.is_empty() {
            return Err(CoachError::MissingFocus);
        }

        let request = GenerateRequest {
            contents: vec![Content::user(SUGGEST_PROMPT.replace("{focus}", focus))],
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } },
            })),
            ..Default::default()
        };

        let text = self.generate(&request).await?.text()?;
        let suggestions: Vec<String> = serde_json::from_str(text.trim())?;
        info!(focus, count = suggestions.len(), "received exercise suggestions");
        Ok(suggestions)
    }

    /// Answer a question with Google Search grounding
    pub async fn grounded_search(&self, query: &str) -> Result<SearchResult, CoachError> {
        let request = GenerateRequest {
            contents: vec![Content::user(query)],
            tools: vec![json!({ "googleSearch": {} })],
            ..Default::default()
        };

        let response = self.generate(&request).await?;
        Ok(SearchResult {
            text: response.text()?,
            sources: response.sources(),
        })
    }

    /// Coaching feedback on a photo of the user performing `exercise`
    pub async fn form_feedback(
        &self,
        exercise: &str,
        image: &ImagePayload,
    ) -> Result<String, CoachError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![
                    Part::text(FEEDBACK_PROMPT.replace("{exercise}", exercise)),
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        }),
                    },
                ],
            }],
            ..Default::default()
        };

        self.generate(&request).await?.text()
    }
}

//! Google Gemini Provider

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::ServiceError;
use crate::infrastructure::llm::{LLMResult, LLM};

/// Gemini API endpoint
const API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the API key; kept out of the URL so it never shows up in error text
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model used when `GEMINI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Gemini provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the provider at a different host
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// API request structure
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

impl GenerateResponse {
    /// Text of the first candidate, with all its text parts joined
    fn into_text(self) -> LLMResult<String> {
        if let Some(error) = self.error {
            return Err(ServiceError::Rejected(error.message));
        }

        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ServiceError::EmptyResponse(format!("prompt blocked: {}", reason)));
        }

        let candidate = self.candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| ServiceError::EmptyResponse("no candidates in response".to_string()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text: String = candidate.content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ServiceError::EmptyResponse(format!(
                "candidate has no text (finish reason: {})",
                if finish_reason.is_empty() { "unknown" } else { finish_reason.as_str() }
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> LLMResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.without_url().to_string()))?;

        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        parsed.into_text()
    }
}

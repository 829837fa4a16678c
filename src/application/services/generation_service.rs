use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::infrastructure::config::GEMINI_KEY_VAR;
use crate::infrastructure::llm::LLM;
use super::preview;

pub const NOT_CONFIGURED_REPLY: &str = "Gemini API key not configured. Please set GEMINI_API_KEY in .env";
pub const FAILURE_REPLY: &str = "Sorry, an error occurred while trying to get a response from Gemini.";

/// Answers free-text prompts through an optional text-generation provider
#[derive(Clone, Default)]
pub struct GenerationService {
    provider: Option<Arc<dyn LLM>>,
}

impl GenerationService {
    pub fn new(provider: Option<Arc<dyn LLM>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate a response for `prompt`; never touches the network when unconfigured
    pub async fn ask(&self, prompt: &str) -> Result<String, ServiceError> {
        let Some(provider) = &self.provider else {
            tracing::warn!("Gemini API call attempted but API key is not configured");
            return Err(ServiceError::NotConfigured {
                service: "Gemini",
                env_var: GEMINI_KEY_VAR,
            });
        };

        tracing::info!(provider = provider.name(), prompt = %preview(prompt), "Generating response");

        match provider.generate(prompt).await {
            Ok(text) => {
                tracing::info!(provider = provider.name(), chars = text.chars().count(), "Response generated");
                Ok(text)
            }
            Err(e) => {
                tracing::error!(provider = provider.name(), prompt = %preview(prompt), error = %e, "Generation failed");
                Err(e)
            }
        }
    }

    /// The text shown to the user for a failed call
    pub fn reply_for(err: &ServiceError) -> &'static str {
        if err.is_not_configured() {
            NOT_CONFIGURED_REPLY
        } else {
            FAILURE_REPLY
        }
    }
}

//! LLM traits - Text generation interface

use async_trait::async_trait;

use crate::application::errors::ServiceError;

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, ServiceError>;

/// LLM Provider trait
#[async_trait]
pub trait LLM: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Single-shot completion: one prompt in, the model's text out
    async fn generate(&self, prompt: &str) -> LLMResult<String>;
}

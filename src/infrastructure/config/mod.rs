//! Credential loading
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file) and are read exactly once at startup.

use std::fmt;
use crate::application::errors::ConfigError;

pub const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
pub const TAVILY_KEY_VAR: &str = "TAVILY_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";

/// Secrets and optional overrides read at startup
#[derive(Clone, Default)]
pub struct Credentials {
    pub discord_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub gemini_model: Option<String>,
}

impl Credentials {
    /// Load from environment variables
    pub fn load_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = Self {
            discord_token: read(DISCORD_TOKEN_VAR),
            gemini_api_key: read(GEMINI_KEY_VAR),
            tavily_api_key: read(TAVILY_KEY_VAR),
            gemini_model: read(GEMINI_MODEL_VAR),
        };

        for (var, present) in credentials.status() {
            if present {
                tracing::info!("{} loaded", var);
            } else {
                tracing::warn!("{} not set; the features that need it are disabled", var);
            }
        }

        credentials
    }

    /// Replace the chat token, e.g. from the command line
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.discord_token = Some(token);
        }
        self
    }

    /// The chat token, which the bot cannot start without
    pub fn discord_token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField(DISCORD_TOKEN_VAR.to_string()))
    }

    /// Presence of each secret, by variable name
    pub fn status(&self) -> [(&'static str, bool); 3] {
        [
            (DISCORD_TOKEN_VAR, self.discord_token.is_some()),
            (GEMINI_KEY_VAR, self.gemini_api_key.is_some()),
            (TAVILY_KEY_VAR, self.tavily_api_key.is_some()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("discord_token", &redact(&self.discord_token))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("gemini_model", &self.gemini_model)
            .finish()
    }
}

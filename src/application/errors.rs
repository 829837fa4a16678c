//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from the external generation and search services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service} API key not configured (set {env_var})")]
    NotConfigured {
        service: &'static str,
        env_var: &'static str,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    /// Error object returned inside a successful response
    #[error("API error: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl ServiceError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, ServiceError::NotConfigured { .. })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(String),
}

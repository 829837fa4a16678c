use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::infrastructure::config::TAVILY_KEY_VAR;
use crate::infrastructure::search::{SearchDepth, SearchHit, SearchProvider};
use super::preview;

pub const NOT_CONFIGURED_REPLY: &str = "Tavily API key not configured. Please set TAVILY_API_KEY in .env";
pub const FAILURE_REPLY: &str = "Sorry, an error occurred while performing the search.";
pub const NO_RESULTS_REPLY: &str = "No search results found.";

/// Hits requested per query
pub const MAX_RESULTS: usize = 5;

/// Runs web searches through an optional provider and formats the hits
#[derive(Clone, Default)]
pub struct SearchService {
    provider: Option<Arc<dyn SearchProvider>>,
}

impl SearchService {
    pub fn new(provider: Option<Arc<dyn SearchProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Search for `query` and return the formatted result block
    pub async fn search(&self, query: &str) -> Result<String, ServiceError> {
        let Some(provider) = &self.provider else {
            tracing::warn!("Tavily search attempted but API key is not configured");
            return Err(ServiceError::NotConfigured {
                service: "Tavily",
                env_var: TAVILY_KEY_VAR,
            });
        };

        tracing::info!(provider = provider.name(), query = %preview(query), "Performing search");

        match provider.search(query, MAX_RESULTS, SearchDepth::Basic).await {
            Ok(hits) => {
                tracing::info!(provider = provider.name(), query = %preview(query), results = hits.len(), "Search completed");
                Ok(format_hits(&hits))
            }
            Err(e) => {
                tracing::error!(provider = provider.name(), query = %preview(query), error = %e, "Search failed");
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

/// Two lines per hit, blank line between hits, provider order kept
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS_REPLY.to_string();
    }

    hits.iter()
        .map(|hit| {
            format!(
                "Title: {}\nURL: <{}>",
                hit.title.as_deref().unwrap_or("N/A"),
                hit.url.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

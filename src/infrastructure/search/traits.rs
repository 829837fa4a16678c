//! Search traits - Unified web search interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::errors::ServiceError;

/// Result type for search operations
pub type SearchResult<T> = Result<T, ServiceError>;

/// One search hit; providers may omit either field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
impl SearchHit {
    pub fn new(title: Option<&str>, url: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            url: url.map(str::to_string),
        }
    }
}

/// How much work the provider should put into a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
}

/// Search provider trait
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Run one query, returning at most `max_results` hits in relevance order
    async fn search(&self, query: &str, max_results: usize, depth: SearchDepth) -> SearchResult<Vec<SearchHit>>;
}

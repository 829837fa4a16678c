//! Tavily Provider - Web search API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::ServiceError;
use crate::infrastructure::search::{SearchDepth, SearchHit, SearchProvider, SearchResult};

/// Tavily API endpoint
const API_BASE: &str = "https://api.tavily.com";

/// Tavily provider
pub struct TavilyProvider {
    api_key: String,
    client: Client,
    base_url: String,
}

impl TavilyProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the provider at a different host
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

/// API request structure
#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ResultItem>,
}

#[derive(Deserialize, Debug)]
struct ResultItem {
    title: Option<String>,
    url: Option<String>,
}

impl From<ResultItem> for SearchHit {
    fn from(item: ResultItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &str, max_results: usize, depth: SearchDepth) -> SearchResult<Vec<SearchHit>> {
        let request = SearchRequest {
            query,
            search_depth: depth,
            max_results,
        };

        let response = self.client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.results.into_iter().map(SearchHit::from).collect())
    }
}

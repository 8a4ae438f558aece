use crate::config::Config;
use crate::search::{SearchGateway, SearchProvider};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: SearchGateway,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            config,
            gateway: SearchGateway::new(provider),
        }
    }
}

// API Request/Response types

fn default_max_results() -> u32 {
    10
}

#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SearchRequest {
    /// Provider query syntax, forwarded as-is
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    /// No upper clamp here; arXiv enforces its own limits
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// A paper as the front end consumes it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArxivPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Single line, trimmed
    pub summary: String,
    /// RFC 3339 timestamp
    pub published: String,
    pub link: String,
    pub pdf_link: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
    pub papers: Vec<ArxivPaper>,
    pub total: usize,
}

impl SearchResponse {
    pub fn new(papers: Vec<ArxivPaper>) -> Self {
        let total = papers.len();
        Self { papers, total }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

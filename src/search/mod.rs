//! Search Module
//!
//! Paper search against an external bibliographic index:
//! - `arxiv` - Client for the arXiv Atom API (the production provider)
//! - `gateway` - Maps provider records into the API's `ArxivPaper` shape
//!
//! Providers hand back a lazy stream of records. The gateway drains it
//! completely before answering, so a failure anywhere in the stream fails
//! the whole search.

pub mod arxiv;
pub mod gateway;

pub use arxiv::ArxivClient;
pub use gateway::{normalize_summary, SearchGateway};

use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use thiserror::Error;

/// Errors a search provider can raise while building or running a query
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("provider error: {0}")]
    Api(String),

    #[error("malformed provider response: {0}")]
    Parse(String),

    #[error("provider returned an empty page at offset {0} before all results were received")]
    UnexpectedEmptyPage(u32),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Network(e.to_string())
    }
}

/// Field used to order provider results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    Relevance,
    LastUpdatedDate,
    SubmittedDate,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Relevance => "relevance",
            SortCriterion::LastUpdatedDate => "lastUpdatedDate",
            SortCriterion::SubmittedDate => "submittedDate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// A query as handed to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Search string in the provider's own syntax, passed through untouched
    pub query: String,
    /// Upper bound on the number of records the provider yields
    pub max_results: u32,
    pub sort_by: SortCriterion,
    pub sort_order: SortOrder,
}

impl ProviderQuery {
    /// Most recently submitted papers first
    pub fn newest_first(query: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: query.into(),
            max_results,
            sort_by: SortCriterion::SubmittedDate,
            sort_order: SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

/// One result item as the provider returns it, before reshaping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub entry_id: String,
    pub title: String,
    pub authors: Vec<Author>,
    /// Raw abstract, may contain embedded line breaks
    pub summary: String,
    pub published: DateTime<Utc>,
    pub link: String,
    pub pdf_link: String,
}

/// Lazy sequence of records; each item may fail independently
pub type RecordStream = BoxStream<'static, Result<ProviderRecord, ProviderError>>;

/// A bibliographic search backend
pub trait SearchProvider: Send + Sync {
    /// Human-readable provider name, used in logs
    fn name(&self) -> &str;

    /// Start a search. Query construction problems are reported here;
    /// network and response errors surface while the stream is polled.
    fn search(&self, query: &ProviderQuery) -> Result<RecordStream, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_query() {
        let query = ProviderQuery::newest_first("quantum computing", 5);
        assert_eq!(query.query, "quantum computing");
        assert_eq!(query.max_results, 5);
        assert_eq!(query.sort_by, SortCriterion::SubmittedDate);
        assert_eq!(query.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_sort_parameter_names() {
        // Must match the arXiv API's sortBy / sortOrder values
        assert_eq!(SortCriterion::Relevance.as_str(), "relevance");
        assert_eq!(SortCriterion::LastUpdatedDate.as_str(), "lastUpdatedDate");
        assert_eq!(SortCriterion::SubmittedDate.as_str(), "submittedDate");
        assert_eq!(SortOrder::Ascending.as_str(), "ascending");
        assert_eq!(SortOrder::Descending.as_str(), "descending");
    }

    #[test]
    fn test_error_messages_carry_cause() {
        let err = ProviderError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = ProviderError::HttpStatus(503);
        assert_eq!(err.to_string(), "provider returned HTTP status 503");
    }
}

//! Search Gateway
//!
//! Dispatches a [`SearchRequest`] to a [`SearchProvider`] and reshapes the
//! records into the flat [`ArxivPaper`] contract served to the front end.

use super::{ProviderError, ProviderQuery, ProviderRecord, SearchProvider};
use crate::models::{ArxivPaper, SearchRequest, SearchResponse};
use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct SearchGateway {
    provider: Arc<dyn SearchProvider>,
}

impl SearchGateway {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Run a search, newest submissions first.
    ///
    /// The provider's stream is drained before returning. If it fails
    /// part-way, the records already received are dropped and only the
    /// error is returned.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ProviderError> {
        let query = ProviderQuery::newest_first(request.query.as_str(), request.max_results);

        info!(
            provider = self.provider.name(),
            query = %query.query,
            max_results = query.max_results,
            "Dispatching search"
        );

        let result = match self.provider.search(&query) {
            Ok(records) => records.map_ok(ArxivPaper::from).try_collect::<Vec<_>>().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(papers) => {
                info!(count = papers.len(), "Search completed");
                Ok(SearchResponse::new(papers))
            }
            Err(e) => {
                error!(provider = self.provider.name(), error = %e, "Search failed");
                Err(e)
            }
        }
    }
}

impl From<ProviderRecord> for ArxivPaper {
    fn from(record: ProviderRecord) -> Self {
        Self {
            id: record.entry_id,
            title: record.title,
            authors: record.authors.into_iter().map(|a| a.name).collect(),
            summary: normalize_summary(&record.summary),
            published: record.published.to_rfc3339(),
            link: record.link,
            pdf_link: record.pdf_link,
        }
    }
}

/// Line-breaking characters: LF, CR, VT, FF, NEL, LINE SEPARATOR, PARAGRAPH SEPARATOR
const LINE_BREAKS: [char; 7] = ['\n', '\r', '\u{0B}', '\u{0C}', '\u{85}', '\u{2028}', '\u{2029}'];

/// Replace every line break with a space, then trim the ends
pub fn normalize_summary(summary: &str) -> String {
    summary.replace(LINE_BREAKS, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Author, RecordStream, SortCriterion, SortOrder};
    use chrono::{TimeZone, Utc};
    use futures::stream::{self, StreamExt};
    use std::sync::Mutex;

    /// Replays a fixed sequence of items and remembers the queries it saw
    struct StubProvider {
        items: Vec<Result<ProviderRecord, String>>,
        queries: Mutex<Vec<ProviderQuery>>,
    }

    impl StubProvider {
        fn new(items: Vec<Result<ProviderRecord, String>>) -> Arc<Self> {
            Arc::new(Self {
                items,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    impl SearchProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn search(&self, query: &ProviderQuery) -> Result<RecordStream, ProviderError> {
            self.queries.lock().unwrap().push(query.clone());
            let items: Vec<_> = self
                .items
                .iter()
                .take(query.max_results as usize)
                .cloned()
                .map(|item| item.map_err(ProviderError::Network))
                .collect();
            Ok(stream::iter(items).boxed())
        }
    }

    struct RejectingProvider;

    impl SearchProvider for RejectingProvider {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn search(&self, _query: &ProviderQuery) -> Result<RecordStream, ProviderError> {
            Err(ProviderError::InvalidQuery("unbalanced parenthesis".to_string()))
        }
    }

    fn record(n: u32, day: u32) -> ProviderRecord {
        ProviderRecord {
            entry_id: format!("http://arxiv.org/abs/2401.{:05}v1", n),
            title: format!("Paper {}", n),
            authors: vec![
                Author { name: "Alice Smith".to_string() },
                Author { name: "Bob Jones".to_string() },
            ],
            summary: format!("\n  Abstract of paper {}\nspanning\r\nlines.  \n", n),
            published: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            link: format!("http://arxiv.org/abs/2401.{:05}v1", n),
            pdf_link: format!("http://arxiv.org/pdf/2401.{:05}v1", n),
        }
    }

    fn request(query: &str, max_results: u32) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            max_results,
        }
    }

    #[test]
    fn test_normalize_summary() {
        assert_eq!(normalize_summary("  one\ntwo\n"), "one two");
        assert_eq!(normalize_summary("a\r\nb"), "a  b");
        assert_eq!(normalize_summary("\n\n"), "");
        assert_eq!(normalize_summary("already clean"), "already clean");
    }

    #[test]
    fn test_normalize_summary_unicode_line_breaks() {
        assert_eq!(normalize_summary("a\u{2028}b\u{2029}c"), "a b c");
        assert_eq!(normalize_summary("a\u{85}b\u{0B}c\u{0C}d"), "a b c d");
        assert_eq!(normalize_summary("\u{2028} padded \u{85}"), "padded");

        let normalized = normalize_summary("x\u{0B}\u{0C}\u{85}\u{2028}\u{2029}\r\ny");
        assert!(!normalized.contains(LINE_BREAKS));
    }

    #[test]
    fn test_record_to_paper() {
        let paper = ArxivPaper::from(record(7, 3));

        assert_eq!(paper.id, "http://arxiv.org/abs/2401.00007v1");
        assert_eq!(paper.title, "Paper 7");
        assert_eq!(paper.authors, vec!["Alice Smith", "Bob Jones"]);
        assert_eq!(paper.summary, "Abstract of paper 7 spanning  lines.");
        assert_eq!(paper.published, "2024-01-03T12:00:00+00:00");
        assert_eq!(paper.link, "http://arxiv.org/abs/2401.00007v1");
        assert_eq!(paper.pdf_link, "http://arxiv.org/pdf/2401.00007v1");
    }

    #[tokio::test]
    async fn test_search_newest_first() {
        let provider = StubProvider::new(vec![Ok(record(2, 9)), Ok(record(1, 8))]);
        let gateway = SearchGateway::new(provider.clone());

        let response = gateway.search(&request("quantum computing", 2)).await.unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.papers.len(), response.total);
        assert!(response.papers[0].published >= response.papers[1].published);

        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query, "quantum computing");
        assert_eq!(queries[0].max_results, 2);
        assert_eq!(queries[0].sort_by, SortCriterion::SubmittedDate);
        assert_eq!(queries[0].sort_order, SortOrder::Descending);
    }

    #[tokio::test]
    async fn test_search_preserves_provider_order() {
        // Deliberately not in date order; the gateway must not re-sort
        let provider = StubProvider::new(vec![Ok(record(1, 2)), Ok(record(3, 9)), Ok(record(2, 5))]);
        let gateway = SearchGateway::new(provider);

        let response = gateway.search(&request("electron", 10)).await.unwrap();

        let titles: Vec<&str> = response.papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper 1", "Paper 3", "Paper 2"]);
        assert_eq!(response.total, 3);
        for paper in &response.papers {
            assert!(!paper.summary.contains(LINE_BREAKS));
            assert_eq!(paper.summary, paper.summary.trim());
        }
    }

    #[tokio::test]
    async fn test_empty_results() {
        let gateway = SearchGateway::new(StubProvider::new(vec![]));

        let response = gateway.search(&request("nothing matches", 10)).await.unwrap();

        assert!(response.papers.is_empty());
        assert_eq!(response.total, 0);
    }

    #[tokio::test]
    async fn test_zero_max_results() {
        let gateway = SearchGateway::new(StubProvider::new(vec![Ok(record(1, 1))]));

        let response = gateway.search(&request("electron", 0)).await.unwrap();

        assert!(response.papers.is_empty());
        assert_eq!(response.total, 0);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_discards_partial_results() {
        let provider = StubProvider::new(vec![
            Ok(record(1, 3)),
            Ok(record(2, 2)),
            Err("connection reset".to_string()),
            Ok(record(3, 1)),
        ]);
        let gateway = SearchGateway::new(provider);

        let err = gateway.search(&request("electron", 10)).await.unwrap_err();

        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[tokio::test]
    async fn test_query_construction_failure() {
        let gateway = SearchGateway::new(Arc::new(RejectingProvider));

        let err = gateway.search(&request("(electron", 10)).await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidQuery(_)));
    }
}

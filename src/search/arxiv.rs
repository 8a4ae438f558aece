//! arXiv API Client
//!
//! Queries the arXiv Atom API (`export.arxiv.org/api/query`) and yields
//! results as a lazy stream of [`ProviderRecord`]s.
//!
//! ## Paging
//!
//! arXiv serves results in pages. A page is only requested once the previous
//! one has been consumed, and every page after the first waits for the
//! configured delay (arXiv asks API clients to leave ~3 seconds between
//! calls). The first page reports `opensearch:totalResults`; paging continues
//! until `min(max_results, totalResults)` records have been fetched. An empty
//! page before that point is an error, never a silently shortened result.

use super::{Author, ProviderError, ProviderQuery, ProviderRecord, RecordStream, SearchProvider};
use crate::config::ArxivConfig;
use feed_rs::model::Entry;
use futures::stream::{self, StreamExt, TryStreamExt};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("arxiv-search-gateway/", env!("CARGO_PKG_VERSION"));

/// arXiv search provider
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Client,
    config: ArxivConfig,
}

/// One page of an arXiv response
#[derive(Debug)]
struct FeedPage {
    records: Vec<ProviderRecord>,
    total_results: u32,
}

/// Paging state carried between page requests
struct PageCursor {
    client: ArxivClient,
    base_url: Url,
    query: ProviderQuery,
    start: u32,
    /// `min(max_results, totalResults)`, known once the first page arrives
    target: Option<u32>,
}

impl ArxivClient {
    pub fn new(config: ArxivConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    /// URL for one page of results
    fn page_url(base_url: &Url, query: &ProviderQuery, start: u32, size: u32) -> Url {
        let mut url = base_url.clone();
        url.query_pairs_mut()
            .append_pair("search_query", &query.query)
            .append_pair("start", &start.to_string())
            .append_pair("max_results", &size.to_string())
            .append_pair("sortBy", query.sort_by.as_str())
            .append_pair("sortOrder", query.sort_order.as_str());
        url
    }

    async fn fetch_page(&self, url: Url) -> Result<FeedPage, ProviderError> {
        debug!(url = %url, "Requesting arXiv page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/atom+xml")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            // Rejected queries come back as an Atom feed holding an error entry
            return Err(match parse_feed(&body) {
                Err(err @ ProviderError::Api(_)) => err,
                _ => ProviderError::HttpStatus(status.as_u16()),
            });
        }

        parse_feed(&body)
    }

    async fn next_page(
        mut cursor: PageCursor,
    ) -> Result<Option<(Vec<ProviderRecord>, PageCursor)>, ProviderError> {
        let bound = cursor.target.unwrap_or(cursor.query.max_results);
        if cursor.start >= bound {
            return Ok(None);
        }

        if cursor.start > 0 {
            tokio::time::sleep(cursor.client.config.page_delay).await;
        }

        let size = (bound - cursor.start).min(cursor.client.config.page_size);
        let url = Self::page_url(&cursor.base_url, &cursor.query, cursor.start, size);
        let FeedPage { mut records, total_results } = cursor.client.fetch_page(url).await?;

        let target = *cursor
            .target
            .get_or_insert(cursor.query.max_results.min(total_results));

        if records.is_empty() && cursor.start < target {
            return Err(ProviderError::UnexpectedEmptyPage(cursor.start));
        }

        let wanted = size.min(target.saturating_sub(cursor.start)) as usize;
        if records.len() > wanted {
            warn!(requested = wanted, received = records.len(), "arXiv returned an oversized page");
            records.truncate(wanted);
        }

        cursor.start += records.len() as u32;

        debug!(count = records.len(), start = cursor.start, target, "Received arXiv page");
        Ok(Some((records, cursor)))
    }
}

impl SearchProvider for ArxivClient {
    fn name(&self) -> &str {
        "arXiv"
    }

    fn search(&self, query: &ProviderQuery) -> Result<RecordStream, ProviderError> {
        let base_url = Url::parse(&self.config.api_url).map_err(|e| {
            ProviderError::InvalidQuery(format!("bad API URL '{}': {}", self.config.api_url, e))
        })?;

        info!(
            query = %query.query,
            max_results = query.max_results,
            sort_by = query.sort_by.as_str(),
            sort_order = query.sort_order.as_str(),
            "Searching arXiv"
        );

        let cursor = PageCursor {
            client: self.clone(),
            base_url,
            query: query.clone(),
            start: 0,
            target: None,
        };

        let records = stream::try_unfold(cursor, Self::next_page)
            .map_ok(|page| stream::iter(page.into_iter().map(Ok::<_, ProviderError>)))
            .try_flatten()
            .boxed();

        Ok(records)
    }
}

/// Parse an arXiv Atom response body into records plus the result count
fn parse_feed(body: &[u8]) -> Result<FeedPage, ProviderError> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| ProviderError::Parse(format!("failed to parse Atom feed: {}", e)))?;

    let records = feed
        .entries
        .iter()
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let total_results = total_results(body)?
        .ok_or_else(|| ProviderError::Parse("missing opensearch:totalResults".to_string()))?;

    Ok(FeedPage { records, total_results })
}

/// Read `opensearch:totalResults`, which feed-rs does not expose
fn total_results(body: &[u8]) -> Result<Option<u32>, ProviderError> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    let mut in_total = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                in_total = e.local_name().as_ref() == b"totalResults";
            }
            Ok(Event::Text(e)) if in_total => {
                let text = e
                    .unescape()
                    .map_err(|e| ProviderError::Parse(format!("bad totalResults: {}", e)))?;
                return text
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|e| ProviderError::Parse(format!("bad totalResults '{}': {}", text.trim(), e)));
            }
            Ok(Event::End(_)) => in_total = false,
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(ProviderError::Parse(format!("failed to read feed XML: {}", e))),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_entry(entry: &Entry) -> Result<ProviderRecord, ProviderError> {
    if entry.id.contains("/api/errors") {
        let message = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .unwrap_or_else(|| entry.id.clone());
        return Err(ProviderError::Api(message));
    }

    let published = entry
        .published
        .ok_or_else(|| ProviderError::Parse(format!("entry {} has no published date", entry.id)))?;

    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();

    let summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .unwrap_or_default();

    let authors = entry
        .authors
        .iter()
        .map(|a| Author { name: a.name.clone() })
        .collect();

    let pdf_link = entry
        .links
        .iter()
        .find(|l| l.title.as_deref() == Some("pdf"))
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry.id.replacen("/abs/", "/pdf/", 1));

    Ok(ProviderRecord {
        entry_id: entry.id.clone(),
        title,
        authors,
        summary,
        published,
        // The abstract page URL is the entry id itself
        link: entry.id.clone(),
        pdf_link,
    })
}

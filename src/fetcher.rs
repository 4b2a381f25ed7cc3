//! Feed fetching and normalization. A failing feed never aborts a batch:
//! its `FeedResult` carries the error and an empty item list.

use crate::types::{FeedItem, FeedResult, Source, SourceType};
use chrono::Utc;
use feed_rs::parser;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_items_per_feed: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "content-curator/1.0".to_string(),
            timeout_seconds: 30,
            max_items_per_feed: 50,
        }
    }
}

pub struct FeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl FeedFetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch and parse a single feed. Network, HTTP and parse failures are
    /// captured in the result's `error` field so callers can continue with
    /// the rest of the batch.
    pub async fn fetch_feed(&self, url: &str) -> FeedResult {
        debug!("Fetching feed: {}", url);

        let content = match self.fetch_body(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Feed fetch failed for {}: {}", url, e);
                return FeedResult {
                    url: url.to_string(),
                    title: "Erreur".to_string(),
                    description: String::new(),
                    items: Vec::new(),
                    error: Some(e),
                };
            }
        };

        self.parse_feed_document(url, &content)
    }

    async fn fetch_body(&self, url: &str) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }

        response.text().await.map_err(|e| e.to_string())
    }

    /// Parse an RSS/Atom document into a normalized result. Public so the
    /// normalization rules can be tested without a network.
    pub fn parse_feed_document(&self, url: &str, content: &str) -> FeedResult {
        let feed = match parser::parse(content.as_bytes()) {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Feed parse failed for {}: {}", url, e);
                return FeedResult {
                    url: url.to_string(),
                    title: "Erreur".to_string(),
                    description: String::new(),
                    items: Vec::new(),
                    error: Some(format!("Failed to parse feed: {}", e)),
                };
            }
        };

        let fetch_time = Utc::now();
        let items: Vec<FeedItem> = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.links.first()?.href.clone();
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Sans titre".to_string());
                // Prefer the summary; fall back to full content.
                let description = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default();
                let pub_date = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or(fetch_time);
                let category = entry
                    .categories
                    .first()
                    .map(|c| c.label.clone().unwrap_or_else(|| c.term.clone()));
                let author = entry.authors.first().map(|a| a.name.clone());

                Some(FeedItem {
                    title,
                    description,
                    link,
                    pub_date,
                    category,
                    author,
                })
            })
            .take(self.config.max_items_per_feed)
            .collect();

        debug!("Parsed {} items from {}", items.len(), url);

        FeedResult {
            url: url.to_string(),
            title: feed
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Sans titre".to_string()),
            description: feed.description.map(|d| d.content).unwrap_or_default(),
            items,
            error: None,
        }
    }

    /// Fetch every URL with all requests in flight simultaneously. Results
    /// are positionally aligned with the input; one feed's failure does not
    /// affect another's slot.
    pub async fn fetch_multiple_feeds(&self, urls: &[String]) -> Vec<FeedResult> {
        join_all(urls.iter().map(|url| self.fetch_feed(url))).await
    }

    /// Fetch content for all active RSS sources, keyed by source id.
    pub async fn fetch_sources_content(&self, sources: &[Source]) -> Vec<(Uuid, FeedResult)> {
        let active: Vec<&Source> = sources
            .iter()
            .filter(|s| s.active && s.source_type == SourceType::Rss)
            .collect();

        let urls: Vec<String> = active.iter().map(|s| s.url.clone()).collect();
        let results = self.fetch_multiple_feeds(&urls).await;

        active
            .into_iter()
            .zip(results)
            .map(|(source, result)| (source.id, result))
            .collect()
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

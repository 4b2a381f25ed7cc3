//! Request/response surface tying the store, fetcher, scraper and pipeline
//! together. This is the boundary a host UI talks to; every operation is a
//! plain async call.

use crate::catalog::feed_to_post_category;
use crate::fetcher::FeedFetcher;
use crate::pipeline::ContentPipeline;
use crate::scraper::ArticleScraper;
use crate::store::Store;
use crate::types::{
    CuratorError, FeedResult, GeneratedPostEntry, NewsItem, PostBundle, PostCategory, Result,
    ScrapedArticle, SourceUpdate, StoredFeedItem,
};
use chrono::Utc;
use serde::Serialize;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};
use uuid::Uuid;

/// How many stored items are handed to the pipeline per generation request.
const NEWS_BATCH_LIMIT: usize = 20;

/// Partial-success report for a batch refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub total_sources: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub new_items: usize,
    pub errors: Vec<String>,
}

pub struct CuratorService {
    store: Store,
    fetcher: FeedFetcher,
    scraper: ArticleScraper,
    pipeline: ContentPipeline,
}

impl CuratorService {
    pub fn new(
        store: Store,
        fetcher: FeedFetcher,
        scraper: ArticleScraper,
        pipeline: ContentPipeline,
    ) -> Self {
        Self {
            store,
            fetcher,
            scraper,
            pipeline,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Fetch a batch of feed URLs; results stay positionally aligned.
    pub async fn fetch_feeds(&self, urls: &[String]) -> Vec<FeedResult> {
        self.fetcher.fetch_multiple_feeds(urls).await
    }

    /// Fetch every active source, persist the new items and update source
    /// stats. One broken feed never blocks the rest; the summary reports
    /// partial success.
    pub async fn refresh_sources(&mut self) -> Result<RefreshSummary> {
        let sources = self.store.sources().to_vec();
        let results = self.fetcher.fetch_sources_content(&sources).await;
        let total_sources = results.len();

        let mut succeeded = 0;
        let mut failed = 0;
        let mut errors = Vec::new();
        let mut all_items: Vec<StoredFeedItem> = Vec::new();
        let now = Utc::now();

        for (source_id, result) in results {
            let source = match sources.iter().find(|s| s.id == source_id) {
                Some(s) => s,
                None => continue,
            };

            if let Some(err) = result.error {
                warn!("Feed refresh failed for {}: {}", source.name, err);
                errors.push(format!("{}: {}", source.name, err));
                failed += 1;
                self.store.update_source(
                    source_id,
                    SourceUpdate {
                        error_count: Some(source.error_count.unwrap_or(0) + 1),
                        ..Default::default()
                    },
                )?;
                continue;
            }

            succeeded += 1;
            let item_count = result.items.len();
            all_items.extend(result.items.into_iter().map(|item| StoredFeedItem {
                id: Uuid::new_v4(),
                source_id,
                source_name: source.name.clone(),
                feed_category: source.feed_category,
                fetched_at: now,
                is_read: false,
                item,
            }));

            self.store.update_source(
                source_id,
                SourceUpdate {
                    last_update: Some(now),
                    total_posts: Some(item_count),
                    ..Default::default()
                },
            )?;
        }

        let new_items = self.store.add_feed_items(all_items)?;
        info!(
            "Refreshed {}/{} sources, {} new items",
            succeeded, total_sources, new_items
        );

        Ok(RefreshSummary {
            total_sources,
            succeeded,
            failed,
            new_items,
            errors,
        })
    }

    /// Stored items routed to a post category through the feed-category
    /// mapping, newest first, capped for the pipeline.
    pub fn news_for_category(&self, category: PostCategory) -> Vec<NewsItem> {
        self.store
            .feed_items()
            .iter()
            .filter(|item| feed_to_post_category(item.feed_category) == category)
            .take(NEWS_BATCH_LIMIT)
            .map(|item| NewsItem {
                title: item.item.title.clone(),
                description: item.item.description.clone(),
                link: item.item.link.clone(),
                pub_date: item.fetched_at,
                category,
            })
            .collect()
    }

    /// Multi-post generation from the stored news of one category.
    pub async fn generate_content_from_news(
        &self,
        category: PostCategory,
    ) -> Result<Vec<GeneratedPostEntry>> {
        let news = self.news_for_category(category);
        if news.is_empty() {
            return Err(CuratorError::NoNewsItems);
        }
        self.pipeline.generate_multi_posts(news).await
    }

    /// Single-best generation from the stored news of one category.
    pub async fn generate_single_from_news(&self, category: PostCategory) -> Result<PostBundle> {
        self.pipeline
            .generate_single_post(self.news_for_category(category))
            .await
    }

    /// Scrape one article and draft three posts from it.
    pub async fn generate_content_from_article(&self, url: &str) -> Result<Vec<PostBundle>> {
        let article = self.scraper.scrape_article(url).await?;
        self.pipeline.generate_from_article(&article, url).await
    }

    /// Draft three posts from raw pasted text.
    pub async fn generate_content_from_text(&self, text: &str) -> Result<Vec<PostBundle>> {
        self.pipeline.generate_from_text(text).await
    }

    pub async fn scrape_article(&self, url: &str) -> Result<ScrapedArticle> {
        self.scraper.scrape_article(url).await
    }

    /// Repeating refresh loop: fetch active sources and evict stale items
    /// on a fixed interval. Runs until the task is dropped.
    pub async fn run_auto_update(&mut self, every: Duration) -> Result<()> {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            match self.refresh_sources().await {
                Ok(summary) => {
                    if !summary.errors.is_empty() {
                        warn!(
                            "Refresh finished with {} failures: {}",
                            summary.failed,
                            summary.errors.join("; ")
                        );
                    }
                }
                Err(e) => error!("Refresh failed: {}", e),
            }
            self.store.clear_old_feed_items(7)?;
        }
    }
}

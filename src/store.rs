//! Local persisted store: a single JSON document holding sources, settings,
//! the category catalog and the ingested feed items. Single-writer by
//! construction; every mutation rewrites the document on disk.

use crate::catalog::{self, FeedCategory};
use crate::types::{
    AppSettings, AppSettingsUpdate, CuratorError, Result, Source, SourceUpdate, StoredFeedItem,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// The persisted document. Every field defaults so older or partial files
/// load without migration logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default = "catalog::default_categories")]
    pub categories: Vec<FeedCategory>,
    #[serde(default)]
    pub feed_items: Vec<StoredFeedItem>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            settings: AppSettings::default(),
            categories: catalog::default_categories(),
            feed_items: Vec::new(),
        }
    }
}

/// Maximum number of feed items retained after a bulk insert.
const MAX_FEED_ITEMS: usize = 1000;

pub struct Store {
    path: PathBuf,
    doc: StoreDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub total: usize,
    pub active: usize,
    pub by_category: HashMap<String, usize>,
    pub by_type: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItemStats {
    pub total: usize,
    pub unread: usize,
    pub by_category: HashMap<String, usize>,
    pub recent: usize,
}

impl Store {
    /// Load (or create) the store document at `path`, remove sources with
    /// known-broken URLs, seed any catalog feeds not yet present, and flush.
    /// I/O and deserialization failures propagate; there is no recovery path
    /// for a corrupt document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            StoreDocument::default()
        };

        let mut store = Self { path, doc };
        store.remove_broken_sources();
        store.seed_default_sources();
        store.flush()?;

        Ok(store)
    }

    fn flush(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove_broken_sources(&mut self) {
        let before = self.doc.sources.len();
        self.doc
            .sources
            .retain(|s| !catalog::BROKEN_FEED_URLS.contains(&s.url.as_str()));
        let removed = before - self.doc.sources.len();
        if removed > 0 {
            info!("Removed {} sources with broken feed URLs", removed);
        }
    }

    fn seed_default_sources(&mut self) {
        let now = Utc::now();
        let mut added = 0;

        let feeds: Vec<_> = self
            .doc
            .categories
            .iter()
            .flat_map(|c| c.feeds.iter().cloned())
            .collect();

        for feed in feeds {
            let exists = self.doc.sources.iter().any(|s| s.url == feed.url);
            if !exists {
                self.doc.sources.push(Source {
                    id: Uuid::new_v4(),
                    name: feed.name,
                    url: feed.url,
                    source_type: feed.source_type,
                    category: feed.category,
                    feed_category: feed.feed_category,
                    active: true,
                    last_update: now,
                    total_posts: None,
                    error_count: None,
                });
                added += 1;
            }
        }

        if added > 0 {
            info!("Seeded {} default sources", added);
        }
    }

    // Sources

    pub fn sources(&self) -> &[Source] {
        &self.doc.sources
    }

    /// Create a source with a generated id. Rejects URLs already configured.
    pub fn add_source(
        &mut self,
        name: String,
        url: String,
        source_type: crate::types::SourceType,
        category: crate::types::PostCategory,
        feed_category: crate::types::FeedCategoryType,
    ) -> Result<Source> {
        if self.doc.sources.iter().any(|s| s.url == url) {
            return Err(CuratorError::SourceExists { url });
        }

        let source = Source {
            id: Uuid::new_v4(),
            name,
            url,
            source_type,
            category,
            feed_category,
            active: true,
            last_update: Utc::now(),
            total_posts: None,
            error_count: None,
        };
        self.doc.sources.push(source.clone());
        self.flush()?;
        Ok(source)
    }

    /// Merge partial fields into an existing source.
    pub fn update_source(&mut self, id: Uuid, updates: SourceUpdate) -> Result<()> {
        let source = self
            .doc
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CuratorError::SourceNotFound { id })?;

        if let Some(name) = updates.name {
            source.name = name;
        }
        if let Some(url) = updates.url {
            source.url = url;
        }
        if let Some(source_type) = updates.source_type {
            source.source_type = source_type;
        }
        if let Some(category) = updates.category {
            source.category = category;
        }
        if let Some(feed_category) = updates.feed_category {
            source.feed_category = feed_category;
        }
        if let Some(active) = updates.active {
            source.active = active;
        }
        if let Some(last_update) = updates.last_update {
            source.last_update = last_update;
        }
        if let Some(total_posts) = updates.total_posts {
            source.total_posts = Some(total_posts);
        }
        if let Some(error_count) = updates.error_count {
            source.error_count = Some(error_count);
        }

        self.flush()
    }

    pub fn delete_source(&mut self, id: Uuid) -> Result<()> {
        self.doc.sources.retain(|s| s.id != id);
        self.flush()
    }

    /// Flip `active` and stamp `last_update`.
    pub fn toggle_source(&mut self, id: Uuid) -> Result<()> {
        let source = self
            .doc
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CuratorError::SourceNotFound { id })?;
        source.active = !source.active;
        source.last_update = Utc::now();
        self.flush()
    }

    // Categories

    pub fn categories(&self) -> &[FeedCategory] {
        &self.doc.categories
    }

    /// Add sources from a catalog category, skipping URLs already present.
    /// When `selected_urls` is given, only those feeds are considered.
    pub fn add_sources_from_category(
        &mut self,
        category_id: crate::types::FeedCategoryType,
        selected_urls: Option<&[String]>,
    ) -> Result<usize> {
        let feeds: Vec<_> = match self.doc.categories.iter().find(|c| c.id == category_id) {
            Some(category) => category
                .feeds
                .iter()
                .filter(|feed| match selected_urls {
                    Some(urls) => urls.iter().any(|u| u == &feed.url),
                    None => true,
                })
                .cloned()
                .collect(),
            None => return Ok(0),
        };

        let now = Utc::now();
        let mut added = 0;
        for feed in feeds {
            if self.doc.sources.iter().any(|s| s.url == feed.url) {
                continue;
            }
            self.doc.sources.push(Source {
                id: Uuid::new_v4(),
                name: feed.name,
                url: feed.url,
                source_type: feed.source_type,
                category: feed.category,
                feed_category: feed.feed_category,
                active: true,
                last_update: now,
                total_posts: None,
                error_count: None,
            });
            added += 1;
        }

        if added > 0 {
            self.flush()?;
        }
        Ok(added)
    }

    pub fn export_sources(&self) -> Vec<Source> {
        self.doc.sources.clone()
    }

    /// Replace the source list, keeping only entries with a name and URL.
    pub fn import_sources(&mut self, sources: Vec<Source>) -> Result<()> {
        self.doc.sources = sources
            .into_iter()
            .filter(|s| !s.name.is_empty() && !s.url.is_empty())
            .collect();
        self.flush()
    }

    /// Drop the whole document and re-seed the defaults.
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.doc = StoreDocument::default();
        self.seed_default_sources();
        self.flush()
    }

    // Settings

    pub fn settings(&self) -> &AppSettings {
        &self.doc.settings
    }

    pub fn update_settings(&mut self, updates: AppSettingsUpdate) -> Result<()> {
        let s = &mut self.doc.settings;
        if let Some(v) = updates.default_category {
            s.default_category = v;
        }
        if let Some(v) = updates.include_hashtags {
            s.include_hashtags = v;
        }
        if let Some(v) = updates.thread_format {
            s.thread_format = v;
        }
        if let Some(v) = updates.max_posts_per_day {
            s.max_posts_per_day = v;
        }
        if let Some(v) = updates.rss_update_interval {
            s.rss_update_interval = v;
        }
        if let Some(v) = updates.auto_collect_content {
            s.auto_collect_content = v;
        }
        if let Some(v) = updates.theme {
            s.theme = v;
        }
        if let Some(v) = updates.notifications {
            s.notifications = v;
        }
        if let Some(v) = updates.auto_save {
            s.auto_save = v;
        }
        if let Some(v) = updates.language {
            s.language = v;
        }
        self.flush()
    }

    // Feed items

    pub fn feed_items(&self) -> &[StoredFeedItem] {
        &self.doc.feed_items
    }

    /// Bulk insert with link-based dedup. Items whose link is already stored
    /// are dropped; afterwards only the newest 1000 by pub_date are kept.
    /// Returns the number of newly stored items.
    pub fn add_feed_items(&mut self, items: Vec<StoredFeedItem>) -> Result<usize> {
        let new_items: Vec<StoredFeedItem> = items
            .into_iter()
            .filter(|item| {
                !self
                    .doc
                    .feed_items
                    .iter()
                    .any(|existing| existing.item.link == item.item.link)
            })
            .collect();

        if new_items.is_empty() {
            return Ok(0);
        }

        let added = new_items.len();
        self.doc.feed_items.extend(new_items);
        self.doc
            .feed_items
            .sort_by(|a, b| b.item.pub_date.cmp(&a.item.pub_date));
        self.doc.feed_items.truncate(MAX_FEED_ITEMS);
        self.flush()?;

        debug!("Stored {} new feed items", added);
        Ok(added)
    }

    pub fn mark_feed_item_read(&mut self, id: Uuid) -> Result<()> {
        if let Some(item) = self.doc.feed_items.iter_mut().find(|i| i.id == id) {
            item.is_read = true;
        }
        self.flush()
    }

    /// Evict items older than `days_old` days by publication date.
    pub fn clear_old_feed_items(&mut self, days_old: i64) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(days_old);
        let before = self.doc.feed_items.len();
        self.doc.feed_items.retain(|item| item.item.pub_date > cutoff);
        let removed = before - self.doc.feed_items.len();
        if removed > 0 {
            self.flush()?;
            info!("Evicted {} feed items older than {} days", removed, days_old);
        }
        Ok(removed)
    }

    // Stats

    pub fn source_stats(&self) -> SourceStats {
        let sources = &self.doc.sources;
        let mut by_category: HashMap<String, usize> = HashMap::new();
        let mut by_type: HashMap<String, usize> = HashMap::new();
        for source in sources {
            *by_category.entry(source.category.to_string()).or_default() += 1;
            *by_type.entry(source.source_type.to_string()).or_default() += 1;
        }

        SourceStats {
            total: sources.len(),
            active: sources.iter().filter(|s| s.active).count(),
            by_category,
            by_type,
        }
    }

    pub fn feed_item_stats(&self) -> FeedItemStats {
        let items = &self.doc.feed_items;
        let mut by_category: HashMap<String, usize> = HashMap::new();
        for item in items {
            *by_category.entry(item.feed_category.to_string()).or_default() += 1;
        }

        let one_day_ago = Utc::now() - Duration::days(1);

        FeedItemStats {
            total: items.len(),
            unread: items.iter().filter(|i| !i.is_read).count(),
            by_category,
            recent: items.iter().filter(|i| i.item.pub_date > one_day_ago).count(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Coarse post category used for routing generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Tech,
    Business,
    Personal,
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostCategory::Tech => "tech",
            PostCategory::Business => "business",
            PostCategory::Personal => "personal",
        };
        write!(f, "{}", s)
    }
}

/// Finer-grained tag attached to every feed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedCategoryType {
    TechNews,
    Startup,
    Engineering,
    AiMl,
    DesignUx,
    Marketing,
    Learning,
    Science,
}

impl fmt::Display for FeedCategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedCategoryType::TechNews => "tech-news",
            FeedCategoryType::Startup => "startup",
            FeedCategoryType::Engineering => "engineering",
            FeedCategoryType::AiMl => "ai-ml",
            FeedCategoryType::DesignUx => "design-ux",
            FeedCategoryType::Marketing => "marketing",
            FeedCategoryType::Learning => "learning",
            FeedCategoryType::Science => "science",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Rss,
    Website,
    Api,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceType::Rss => "rss",
            SourceType::Website => "website",
            SourceType::Api => "api",
        };
        write!(f, "{}", s)
    }
}

/// Post format assigned by the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostFormat {
    HotTake,
    Question,
    MiniStory,
    Analysis,
    Comparison,
}

impl fmt::Display for PostFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostFormat::HotTake => "hot-take",
            PostFormat::Question => "question",
            PostFormat::MiniStory => "mini-story",
            PostFormat::Analysis => "analysis",
            PostFormat::Comparison => "comparison",
        };
        write!(f, "{}", s)
    }
}

/// A configured feed endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub category: PostCategory,
    pub feed_category: FeedCategoryType,
    pub active: bool,
    pub last_update: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_count: Option<u32>,
}

/// Partial update applied to a stored source.
#[derive(Debug, Clone, Default)]
pub struct SourceUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub source_type: Option<SourceType>,
    pub category: Option<PostCategory>,
    pub feed_category: Option<FeedCategoryType>,
    pub active: Option<bool>,
    pub last_update: Option<DateTime<Utc>>,
    pub total_posts: Option<usize>,
    pub error_count: Option<u32>,
}

/// One normalized entry parsed from an RSS/Atom document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// The result of fetching a single feed URL. A failing feed carries its
/// error here instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub items: Vec<FeedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A fetched feed entry persisted for reuse. `link` is the dedup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFeedItem {
    pub id: Uuid,
    pub source_id: Uuid,
    pub source_name: String,
    pub feed_category: FeedCategoryType,
    pub fetched_at: DateTime<Utc>,
    pub is_read: bool,
    #[serde(flatten)]
    pub item: FeedItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

/// Application settings. Singleton record, merged on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub default_category: PostCategory,
    pub include_hashtags: bool,
    pub thread_format: bool,
    pub max_posts_per_day: u32,
    pub rss_update_interval: u32,
    pub auto_collect_content: bool,
    pub theme: Theme,
    pub notifications: bool,
    pub auto_save: bool,
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_category: PostCategory::Tech,
            include_hashtags: true,
            thread_format: false,
            max_posts_per_day: 5,
            rss_update_interval: 60,
            auto_collect_content: false,
            theme: Theme::Light,
            notifications: true,
            auto_save: true,
            language: Language::Fr,
        }
    }
}

/// Partial settings update merged into the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSettingsUpdate {
    pub default_category: Option<PostCategory>,
    pub include_hashtags: Option<bool>,
    pub thread_format: Option<bool>,
    pub max_posts_per_day: Option<u32>,
    pub rss_update_interval: Option<u32>,
    pub auto_collect_content: Option<bool>,
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub auto_save: Option<bool>,
    pub language: Option<Language>,
}

/// Pipeline input: a news item reduced to what the scorer and agents need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: DateTime<Utc>,
    pub category: PostCategory,
}

/// A news item annotated by the viral-potential scorer. Ephemeral, lives
/// only for the duration of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedNewsItem {
    #[serde(flatten)]
    pub news: NewsItem,
    pub viral_score: f64,
    pub engagement_angle: String,
    pub emotional_approach: String,
    pub suggested_hot_take: String,
    pub reasoning: String,
}

/// A finished social post produced by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub content: String,
    pub format: PostFormat,
    pub hashtags: Vec<String>,
    pub source_url: String,
    pub category: PostCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAlternative {
    pub content: String,
    pub format: PostFormat,
}

/// Output of the single-best pipeline: one polished post plus alternatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBundle {
    pub final_post: GeneratedPost,
    pub alternatives: Vec<PostAlternative>,
}

/// One entry of the multi-post pipeline output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPostEntry {
    pub final_post: GeneratedPost,
    pub source_news: SourceNewsRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNewsRef {
    pub title: String,
    pub viral_score: f64,
}

/// Fields extracted from a scraped web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedArticle {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CuratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("No news items provided")]
    NoNewsItems,

    #[error("No news with sufficient viral potential found")]
    NoViralNews,

    #[error("Article content is empty: {url}")]
    EmptyArticle { url: String },

    #[error("Scrape failed for {url}: {reason}")]
    Scrape { url: String, reason: String },

    #[error("Source not found: {id}")]
    SourceNotFound { id: Uuid },

    #[error("A source with URL {url} already exists")]
    SourceExists { url: String },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, CuratorError>;

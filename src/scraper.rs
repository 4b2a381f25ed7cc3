//! Single-page article scraping. Each field is extracted through an ordered
//! list of CSS selector candidates, evaluated in order with early exit on
//! the first non-empty result. HTTP failure is fatal for the operation;
//! selector exhaustion only degrades the field to a placeholder.

use crate::types::{CuratorError, Result, ScrapedArticle};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const TITLE_PLACEHOLDER: &str = "Article sans titre";
pub const CONTENT_PLACEHOLDER: &str = "Contenu non disponible";

/// Content is cut at this many characters, with an ellipsis appended.
const MAX_CONTENT_CHARS: usize = 5000;

/// A container needs more than this many characters of text to count as the
/// article body; otherwise the paragraph fallback kicks in.
const MIN_CONTENT_CHARS: usize = 100;

const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "title",
    r#"[property="og:title"]"#,
    r#"[name="twitter:title"]"#,
    ".entry-title",
    ".post-title",
    ".article-title",
];

const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".entry-content",
    ".post-content",
    ".article-content",
    ".content",
    "main",
    ".post-body",
    ".entry-body",
];

const AUTHOR_SELECTORS: &[&str] = &[
    r#"[property="article:author"]"#,
    r#"[name="author"]"#,
    ".author",
    ".byline",
    ".post-author",
    ".article-author",
];

const DATE_SELECTORS: &[&str] = &[
    r#"[property="article:published_time"]"#,
    r#"[name="publish_date"]"#,
    "time[datetime]",
    ".date",
    ".post-date",
    ".published",
];

const IMAGE_SELECTORS: &[&str] = &[
    r#"[property="og:image"]"#,
    r#"[name="twitter:image"]"#,
    "article img",
    ".featured-image img",
    ".post-image img",
];

/// Tags whose entire subtree is stripped before text extraction.
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript", "iframe", "form",
];

pub struct ArticleScraper {
    client: Client,
}

impl ArticleScraper {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            )
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch a page and extract its article fields. Network errors and
    /// non-2xx statuses surface as a single descriptive error.
    pub async fn scrape_article(&self, url: &str) -> Result<ScrapedArticle> {
        info!("Scraping article: {}", url);

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| CuratorError::Scrape {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CuratorError::Scrape {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let html = response.text().await.map_err(|e| CuratorError::Scrape {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let article = extract_article(&html, url);
        info!("Article scraped: {}", article.title);
        Ok(article)
    }
}

impl Default for ArticleScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_regexes() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        STRIPPED_TAGS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}>"))
                    .expect("valid strip regex")
            })
            .collect()
    })
}

fn parse_selector(selector: &str) -> Selector {
    Selector::parse(selector).expect("valid CSS selector")
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-empty value for a field: try each selector in order, preferring
/// the listed attributes over element text.
fn select_field(document: &Html, selectors: &[&str], attrs: &[&str]) -> Option<String> {
    for selector in selectors {
        let parsed = parse_selector(selector);
        if let Some(element) = document.select(&parsed).next() {
            for attr in attrs {
                if let Some(value) = element.value().attr(attr) {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
            let text = normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn select_content(document: &Html) -> String {
    for selector in CONTENT_SELECTORS {
        let parsed = parse_selector(selector);
        if let Some(element) = document.select(&parsed).next() {
            let text = normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() > MIN_CONTENT_CHARS {
                return text;
            }
        }
    }

    // Fallback: every paragraph on the page.
    let paragraphs = parse_selector("p");
    let joined = document
        .select(&paragraphs)
        .map(|p| normalize_whitespace(&p.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("Content containers exhausted, using paragraph fallback");
    joined
}

fn resolve_image_url(image: &str, page_url: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        return image.to_string();
    }
    match Url::parse(page_url).and_then(|base| base.join(image)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => image.to_string(),
    }
}

/// Pure extraction half of the scraper, testable without a network. Strips
/// script/style/nav blocks, runs the per-field selector chains, normalizes
/// whitespace and truncates the body.
pub fn extract_article(html: &str, page_url: &str) -> ScrapedArticle {
    let mut cleaned = html.to_string();
    for regex in strip_regexes() {
        cleaned = regex.replace_all(&cleaned, "").into_owned();
    }

    let document = Html::parse_document(&cleaned);

    let title = select_field(&document, TITLE_SELECTORS, &["content"]);

    let mut content = select_content(&document);
    if content.chars().count() > MAX_CONTENT_CHARS {
        content = content.chars().take(MAX_CONTENT_CHARS).collect::<String>() + "...";
    }

    let author = select_field(&document, AUTHOR_SELECTORS, &["content"]);
    let published_date = select_field(&document, DATE_SELECTORS, &["datetime", "content"]);
    let image_url = select_field(&document, IMAGE_SELECTORS, &["content", "src"])
        .map(|img| resolve_image_url(&img, page_url));

    ScrapedArticle {
        title: title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        content: if content.is_empty() {
            CONTENT_PLACEHOLDER.to_string()
        } else {
            content
        },
        author,
        published_date,
        image_url,
    }
}

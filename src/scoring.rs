//! Viral-potential scoring. The keyword list, bonuses and thresholds are
//! tuning constants carried over as configuration data; the algorithm itself
//! is a keyword-count heuristic, not learned ranking.

use crate::types::{NewsItem, PostCategory, PostFormat, RankedNewsItem};

/// Base score every item starts from.
pub const BASE_SCORE: f64 = 5.0;

/// Added for each keyword found in title + description.
pub const KEYWORD_BONUS: f64 = 0.5;

/// Added once when a tech item mentions "ai".
pub const TECH_AI_BONUS: f64 = 1.0;

/// Keywords that raise the estimated viral potential (case-insensitive
/// substring match).
pub const VIRAL_KEYWORDS: &[&str] = &[
    "AI",
    "ChatGPT",
    "layoffs",
    "acquisition",
    "leaked",
    "controversial",
    "breakthrough",
    "first",
    "exclusive",
    "shutdown",
    "hack",
    "security",
    "billion",
    "revolutionize",
];

/// Score and annotate a batch of news items, sorted descending by score.
/// The sort is stable, so ties keep their input order. Empty input yields
/// empty output.
pub fn rank_news_items(items: &[NewsItem]) -> Vec<RankedNewsItem> {
    let mut ranked: Vec<RankedNewsItem> = items
        .iter()
        .map(|item| {
            let content = format!("{} {}", item.title, item.description).to_lowercase();

            let mut score = BASE_SCORE;
            for keyword in VIRAL_KEYWORDS {
                if content.contains(&keyword.to_lowercase()) {
                    score += KEYWORD_BONUS;
                }
            }
            if item.category == PostCategory::Tech && content.contains("ai") {
                score += TECH_AI_BONUS;
            }
            let score = score.clamp(0.0, 10.0);

            RankedNewsItem {
                news: item.clone(),
                viral_score: score,
                engagement_angle: engagement_angle(&content),
                emotional_approach: emotional_approach(&content),
                suggested_hot_take: suggested_hot_take(&content),
                reasoning: "Score based on viral keyword presence, controversy potential and \
                            topic novelty."
                    .to_string(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.viral_score
            .partial_cmp(&a.viral_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Map a viral score to a post format. Exact bands: >=8 hot-take,
/// >=7 question, >=6 analysis, >=5 comparison, else mini-story.
pub fn format_from_score(viral_score: f64) -> PostFormat {
    if viral_score >= 8.0 {
        PostFormat::HotTake
    } else if viral_score >= 7.0 {
        PostFormat::Question
    } else if viral_score >= 6.0 {
        PostFormat::Analysis
    } else if viral_score >= 5.0 {
        PostFormat::Comparison
    } else {
        PostFormat::MiniStory
    }
}

// Keyword-triggered guidance templates with generic fallbacks. Heuristic
// text selection, nothing more.

fn engagement_angle(content: &str) -> String {
    if content.contains("ai") || content.contains("artificial intelligence") {
        "The impact on developers and content creators".to_string()
    } else if content.contains("layoff") {
        "The lessons for tech professionals".to_string()
    } else if content.contains("startup") || content.contains("funding") {
        "What this reveals about the state of the market".to_string()
    } else {
        "The hidden implications of this news".to_string()
    }
}

fn emotional_approach(content: &str) -> String {
    if content.contains("breakthrough") || content.contains("revolutionary") {
        "Measured enthusiasm with open questions".to_string()
    } else if content.contains("controversial") || content.contains("debate") {
        "Curiosity with a nuanced perspective".to_string()
    } else if content.contains("problem") || content.contains("issue") {
        "Empathy with a search for solutions".to_string()
    } else {
        "Genuine interest with critical analysis".to_string()
    }
}

fn suggested_hot_take(content: &str) -> String {
    if content.contains("ai") {
        "Everyone talks about AI, but nobody mentions...".to_string()
    } else if content.contains("funding") || content.contains("investment") {
        "This funding round reveals a trend few have noticed...".to_string()
    } else if content.contains("google") || content.contains("microsoft") || content.contains("apple")
    {
        "The tech giants are showing us once again that...".to_string()
    } else {
        "Here is why this news matters more than it looks...".to_string()
    }
}

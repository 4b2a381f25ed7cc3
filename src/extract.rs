//! Best-effort structured extraction from agent free text. Agents give no
//! structural guarantees, so every parser here degrades to fallback content
//! instead of failing; each fallback path is unit-testable on its own.

use crate::types::{PostAlternative, PostFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engagement {
    High,
    Medium,
    Low,
}

/// One draft parsed out of a variations reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    pub content: String,
    pub format: PostFormat,
    pub tone: String,
    pub estimated_engagement: Engagement,
    pub hashtags: Vec<String>,
}

fn hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+").expect("valid hashtag regex"))
}

fn variation_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^VARIATION \d+:\s*").expect("valid variation prefix regex"))
}

/// Collect `#word` hashtags from text, capped at `max`.
pub fn extract_hashtags(text: &str, max: usize) -> Vec<String> {
    hashtag_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .take(max)
        .collect()
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// First non-empty line of a reply, or the whole text when there is none.
pub fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(text)
        .to_string()
}

/// Derive the recommended post format from an analysis reply by keyword
/// matching. Defaults to hot-take.
pub fn format_from_analysis(analysis: &str) -> PostFormat {
    let lower = analysis.to_lowercase();
    if lower.contains("controvers") || lower.contains("opinion") {
        PostFormat::HotTake
    } else if lower.contains("question") || lower.contains("why") {
        PostFormat::Question
    } else if lower.contains("story") || lower.contains("experience") {
        PostFormat::MiniStory
    } else if lower.contains("implic") || lower.contains("analys") {
        PostFormat::Analysis
    } else if lower.contains("compar") || lower.contains("similar") {
        PostFormat::Comparison
    } else {
        PostFormat::HotTake
    }
}

/// Parse a "VARIATION n: ..." reply into up to 3 drafts. Lines that carry a
/// VARIATION marker or look like a plausible post (20-300 characters) are
/// kept; if nothing matches, the raw reply truncated to 280 characters
/// becomes the single draft.
pub fn parse_variations(text: &str, format: PostFormat) -> Vec<Variation> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let candidates: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let len = line.chars().count();
            line.contains("VARIATION") || (len > 20 && len < 300)
        })
        .take(3)
        .copied()
        .collect();

    let count = candidates.len().max(1);
    let mut variations = Vec::with_capacity(count);

    for i in 0..count {
        let raw = candidates
            .get(i)
            .map(|s| s.to_string())
            .unwrap_or_else(|| truncate_chars(text, 280));
        let content = variation_prefix_regex()
            .replace(&raw, "")
            .trim()
            .to_string();

        let tone = match i {
            0 => "direct",
            1 => "personal",
            _ => "question",
        };

        variations.push(Variation {
            hashtags: extract_hashtags(&content, 3),
            content,
            format,
            tone: tone.to_string(),
            estimated_engagement: if i == 0 {
                Engagement::High
            } else {
                Engagement::Medium
            },
        });
    }

    variations
}

/// Parse the finalization reply: the first line is the polished post, lines
/// 3 and 4 are the alternatives. Missing lines fall back to literal
/// placeholders so the caller always gets a complete bundle.
pub fn parse_final_response(text: &str) -> (String, Vec<PostAlternative>) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let final_content = lines
        .first()
        .map(|l| l.to_string())
        .unwrap_or_else(|| truncate_chars(text, 280));

    let alternatives = vec![
        PostAlternative {
            content: lines
                .get(2)
                .map(|l| l.to_string())
                .unwrap_or_else(|| "Alternative 1".to_string()),
            format: PostFormat::Question,
        },
        PostAlternative {
            content: lines
                .get(3)
                .map(|l| l.to_string())
                .unwrap_or_else(|| "Alternative 2".to_string()),
            format: PostFormat::Analysis,
        },
    ];

    (final_content, alternatives)
}
